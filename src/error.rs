use crate::types::{BodyId, ColliderId, HitboxId, ShapeKind};

/// Errors surfaced by geometry queries and manager lookups.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// The pair has no defined intersection/separation routine.
    #[error("unsupported shape pair: {a:?} vs {b:?}")]
    UnsupportedShapePair { a: ShapeKind, b: ShapeKind },

    #[error("unknown collider: {0:?}")]
    UnknownCollider(ColliderId),

    #[error("unknown physics body: {0:?}")]
    UnknownBody(BodyId),

    #[error("unknown hitbox: {0:?}")]
    UnknownHitbox(HitboxId),

    #[error("invalid layer id {0} (must be below 32)")]
    InvalidLayer(u8),
}

pub type Result<T> = std::result::Result<T, PhysicsError>;
