/// Weight of an algorithm tag in the risk aggregations.
///
/// Asymmetric primitives broken outright by Shor's algorithm weigh 1.6,
/// weak hashes 1.3, everything else 1.0. SCA findings pass the library
/// name through the same keyword rules.
pub fn algorithm_weight(algorithm: &str) -> f64 {
    let lower = algorithm.to_lowercase();
    const ASYMMETRIC: &[&str] = &["rsa", "ecc", "ecdsa", "dsa", "dh", "diffie"];
    const WEAK_HASH: &[&str] = &["md5", "sha1", "weak hash"];

    if ASYMMETRIC.iter().any(|kw| lower.contains(kw)) {
        1.6
    } else if WEAK_HASH.iter().any(|kw| lower.contains(kw)) {
        1.3
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asymmetric_algorithms_weigh_most() {
        assert_eq!(algorithm_weight("RSA"), 1.6);
        assert_eq!(algorithm_weight("ECC/ECDSA"), 1.6);
        assert_eq!(algorithm_weight("Diffie-Hellman"), 1.6);
        assert_eq!(algorithm_weight("node-rsa"), 1.6);
    }

    #[test]
    fn weak_hashes_weigh_mid() {
        assert_eq!(algorithm_weight("Weak Hash"), 1.3);
        assert_eq!(algorithm_weight("md5"), 1.3);
    }

    #[test]
    fn everything_else_is_neutral() {
        assert_eq!(algorithm_weight("AES"), 1.0);
        assert_eq!(algorithm_weight("Unknown"), 1.0);
    }
}
