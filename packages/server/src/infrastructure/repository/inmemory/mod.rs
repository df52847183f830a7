//! インメモリ実装（プロセスの生存期間だけ保持する）

pub mod identity;
pub mod room;

pub use identity::InMemoryIdentityRepository;
pub use room::InMemoryRoomRepository;
