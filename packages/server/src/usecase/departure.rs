//! 参加者が Room を離れるときの共通処理（exit・切断・接続の乗り換えで共有）

use crate::domain::{Departure, GameEvent, IdentityId, RoomRepository};

use super::{combat::CombatScheduler, gateway::BroadcastGateway};

/// `identity_id` を着席中の Room から外す
///
/// 戦闘中の Room なら先に攻撃ループを止めるので、離脱のあとに
/// その Room の `attack` / `victory` が届くことはない。
pub(super) async fn vacate_seat(
    rooms: &dyn RoomRepository,
    scheduler: &CombatScheduler,
    identity_id: &IdentityId,
) -> Option<Departure> {
    if let Some(room) = rooms.find_room_containing(identity_id).await
        && room.in_combat()
    {
        scheduler.cancel(&room.id).await;
    }

    let departure = rooms.remove_identity(identity_id).await?;
    if departure.interrupted_combat {
        // find と remove の間に戦闘が始まっていた場合
        scheduler.cancel(&departure.room_id).await;
    }
    Some(departure)
}

/// 本人の操作によらない離脱。座席を外し、残った参加者に `roomDisconnected` を送る
pub(super) async fn drop_out(
    rooms: &dyn RoomRepository,
    scheduler: &CombatScheduler,
    gateway: &BroadcastGateway,
    identity_id: &IdentityId,
) -> Option<Departure> {
    let departure = vacate_seat(rooms, scheduler, identity_id).await?;
    let remaining: Vec<IdentityId> = departure
        .members_before
        .iter()
        .filter(|member| *member != identity_id)
        .cloned()
        .collect();
    gateway
        .to_members(
            &remaining,
            &GameEvent::RoomDisconnected {
                room_id: departure.room_id.clone(),
                identity: identity_id.clone(),
            },
        )
        .await;
    Some(departure)
}
