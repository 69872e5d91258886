use rand::distributions::Alphanumeric;
use rand::Rng;

/// `prefix` followed by 8 random lowercase letters or digits.
pub fn random_name(prefix: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("{}{}", prefix, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_name_shape() {
        let name = random_name("cosmosdb");
        assert_eq!(name.len(), "cosmosdb".len() + 8);
        assert!(name.starts_with("cosmosdb"));
        assert!(name[8..].chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        assert_ne!(random_name("vnet"), random_name("vnet"));
    }
}
