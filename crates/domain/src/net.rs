//! IPv4 address validation for the static addressing form.

/// Whether `value` is a dotted-quad IPv4 address.
///
/// Exactly four dot-separated groups of one to three ASCII digits, each in
/// `0..=255`. Leading zeros are accepted (`"010.0.0.1"`).
#[must_use]
pub fn is_valid_ip(value: &str) -> bool {
    let mut count = 0;
    for part in value.split('.') {
        count += 1;
        if count > 4 || part.is_empty() || part.len() > 3 {
            return false;
        }
        if !part.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        match part.parse::<u16>() {
            Ok(n) if n <= 255 => {}
            _ => return false,
        }
    }
    count == 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_boundary_addresses() {
        assert!(is_valid_ip("0.0.0.0"));
        assert!(is_valid_ip("255.255.255.255"));
        assert!(is_valid_ip("192.168.1.100"));
    }

    #[test]
    fn should_reject_octet_above_255() {
        assert!(!is_valid_ip("256.0.0.1"));
        assert!(!is_valid_ip("192.168.1.999"));
    }

    #[test]
    fn should_reject_wrong_number_of_groups() {
        assert!(!is_valid_ip("1.2.3"));
        assert!(!is_valid_ip("1.2.3.4.5"));
        assert!(!is_valid_ip(""));
    }

    #[test]
    fn should_reject_non_digit_or_empty_groups() {
        assert!(!is_valid_ip("a.b.c.d"));
        assert!(!is_valid_ip("1..2.3"));
        assert!(!is_valid_ip("1.2.3.4 "));
        assert!(!is_valid_ip("+1.2.3.4"));
        assert!(!is_valid_ip("1234.1.1.1"));
    }
}
