use crate::core::error::{AppError, Result};

/// A resource with a single owning user. Implemented by anything a user may
/// mutate only when they created it (posts, comments, media through their
/// post, ...), so the ownership check lives in exactly one place instead of
/// being repeated per feature.
pub trait Owned {
    fn owner_id(&self) -> i64;
}

/// Authorization predicate applied before any mutating operation on an owned
/// resource. Distinct from not-found: the caller is authenticated but is not
/// the owner.
pub fn ensure_owner<T: Owned>(resource: &T, actor_id: i64) -> Result<()> {
    if resource.owner_id() == actor_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You do not have permission to modify this resource".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Doc {
        owner: i64,
    }

    impl Owned for Doc {
        fn owner_id(&self) -> i64 {
            self.owner
        }
    }

    #[test]
    fn owner_passes() {
        assert!(ensure_owner(&Doc { owner: 7 }, 7).is_ok());
    }

    #[test]
    fn non_owner_is_forbidden() {
        let err = ensure_owner(&Doc { owner: 7 }, 8).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
