//! Age and weight limits imposed by the limited resource strategy.

/// Current caps on passive clauses. A cap only binds when the matching
/// `*_limited` flag is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct Limits {
    pub age_limit: u32,
    pub weight_limit: u32,
    pub age_limited: bool,
    pub weight_limited: bool,
}

impl Limits {
    /// True once any limit binds; completeness is lost from this point.
    pub fn active(&self) -> bool {
        self.age_limited || self.weight_limited
    }

    pub fn fulfils_age(&self, age: u32) -> bool {
        !self.age_limited || age <= self.age_limit
    }

    pub fn fulfils_weight(&self, weight: u32) -> bool {
        !self.weight_limited || weight <= self.weight_limit
    }

    /// A clause stays selectable if either queue may still serve it.
    pub fn fulfils(&self, age: u32, weight: u32) -> bool {
        self.fulfils_age(age) || self.fulfils_weight(weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_accepts_everything() {
        let limits = Limits::default();
        assert!(!limits.active());
        assert!(limits.fulfils(u32::MAX, u32::MAX));
    }

    #[test]
    fn test_either_queue_keeps_a_clause_selectable() {
        let limits = Limits {
            age_limit: 5,
            weight_limit: 10,
            age_limited: true,
            weight_limited: true,
        };
        assert!(limits.active());
        assert!(limits.fulfils(3, 100), "young but heavy stays");
        assert!(limits.fulfils(100, 7), "old but light stays");
        assert!(!limits.fulfils(100, 100));
    }
}
