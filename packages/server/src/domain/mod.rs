//! Domain layer: entities, value objects, combat rules, and the interfaces
//! the outer layers implement.

pub mod combat;
pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use combat::{
    BASELINE_CADENCE_MS, BASELINE_SPEED, MIN_DAMAGE, StatBlock, cadence_for, damage_between,
};
pub use entity::{
    AttackOutcome, CombatPlan, CombatSide, CombatState, Combatant, Departure, Identity,
    Participant, ParticipantStatus, ROOM_CAPACITY, ReadyOutcome, Room, SelectionOutcome,
};
pub use error::{CombatError, MessagePushError, RepositoryError, RoomError, ValueObjectError};
pub use event::{GameEvent, IdentityView};
pub use message_pusher::{MessagePusher, PusherChannel};
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
pub use repository::{IdentityRepository, Registration, RoomRepository};
pub use value_object::{ConnectionId, IdentityId, RoomId, RoomIdFactory, Timestamp};
