use crc32fast::Hasher;

/// Generate a session seed from the root dictionary id using CRC32
pub fn get_session_seed(root_dictionary_id: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(root_dictionary_id.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for new dictionary entries within a session
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
}

impl IdGenerator {
    pub fn new(root_dictionary_id: &str) -> Self {
        Self {
            seed: get_session_seed(root_dictionary_id),
            count: 0,
        }
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    /// Next ID for which `taken` is false
    ///
    /// Entries loaded at initialization may already use the generator's format.
    pub fn new_id_avoiding(&mut self, taken: impl Fn(&str) -> bool) -> String {
        loop {
            let id = self.new_id();
            if !taken(&id) {
                return id;
            }
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_seed_generation() {
        let id1 = get_session_seed("root");
        let id2 = get_session_seed("root");
        assert_eq!(id1, id2);

        let id3 = get_session_seed("other-root");
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = IdGenerator::new("root");

        let id1 = gen.new_id();
        let id2 = gen.new_id();

        assert!(id1.ends_with("-1"));
        assert!(id2.ends_with("-2"));
        assert!(id1.starts_with(gen.seed()));
    }

    #[test]
    fn test_skips_taken_ids() {
        let mut gen = IdGenerator::from_seed("fast");
        let id = gen.new_id_avoiding(|candidate| candidate == "fast-1" || candidate == "fast-2");
        assert_eq!(id, "fast-3");
    }
}
