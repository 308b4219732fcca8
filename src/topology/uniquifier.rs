use crate::consts::DATA_UNIQUIFIERS;

/// The run-scoped pool of adjectives used to rename colliding data.
///
/// The pool starts as the full ordered adjective list and only ever shrinks:
/// during topology reading every adjective that occurs inside a user-chosen
/// data name is dropped, so a generated name can never collide with a user
/// one. After reading, the graph builder consumes adjectives from the head.
/// An empty pool is a fatal condition handled by the caller.
#[derive(Debug)]
pub struct UniquifierPool {
    pool: Vec<&'static str>,
}

impl UniquifierPool {
    pub fn new() -> Self {
        Self {
            pool: DATA_UNIQUIFIERS.to_vec(),
        }
    }

    /// Drop every adjective that occurs as a substring of the given data name.
    pub fn shrink_for(&mut self, data_name: &str) {
        let lowered = data_name.to_lowercase();
        self.pool.retain(|adjective| {
            let keep = !lowered.contains(adjective);
            if !keep {
                tracing::debug!("Removed uniquifier {adjective} from the list of uniquifiers.");
            }
            keep
        });
    }

    /// Take the first remaining adjective, or `None` if the pool is exhausted.
    pub fn take(&mut self) -> Option<&'static str> {
        if self.pool.is_empty() {
            None
        } else {
            Some(self.pool.remove(0))
        }
    }

    pub fn remaining(&self) -> usize {
        self.pool.len()
    }
}

impl Default for UniquifierPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_starts_full_and_ordered() {
        let mut pool = UniquifierPool::new();
        assert_eq!(pool.remaining(), DATA_UNIQUIFIERS.len());
        assert_eq!(pool.take(), Some("magnificent"));
        assert_eq!(pool.take(), Some("grand"));
    }

    #[test]
    fn user_names_shrink_the_pool() {
        let mut pool = UniquifierPool::new();
        pool.shrink_for("Magnificent-Heat");
        assert_eq!(pool.take(), Some("grand"));
    }

    #[test]
    fn exhausted_pool_yields_none() {
        let mut pool = UniquifierPool::new();
        while pool.take().is_some() {}
        assert_eq!(pool.take(), None);
    }
}
