//! Random selection wrapper.

use std::sync::Arc;

use crate::infrastructure::ports::RandomPort;

/// Random service wrapper for use cases.
pub struct RandomService {
    random: Arc<dyn RandomPort>,
}

impl RandomService {
    pub fn new(random: Arc<dyn RandomPort>) -> Self {
        Self { random }
    }

    pub fn gen_range(&self, min: i32, max: i32) -> i32 {
        self.random.gen_range(min, max)
    }

    /// Uniformly pick one element, or `None` for an empty slice.
    pub fn pick<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let max = i32::try_from(items.len() - 1).unwrap_or(i32::MAX);
        let index = usize::try_from(self.gen_range(0, max)).unwrap_or(0);
        items.get(index).or_else(|| items.last())
    }
}
