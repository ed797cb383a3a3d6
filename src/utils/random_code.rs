use rand::Rng;

const CODE_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// 生成指定长度的随机代码（去掉了易混淆的 0/O、1/I）
pub fn generate_random_code(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| CODE_CHARSET[rng.random_range(0..CODE_CHARSET.len())] as char)
        .collect()
}

/// 未指定课程代码时自动生成，如 `CLS-7KQ2MX`
pub fn generate_class_code() -> String {
    format!("CLS-{}", generate_random_code(6))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validate::validate_class_code;

    #[test]
    fn test_random_code_charset() {
        let code = generate_random_code(32);
        assert_eq!(code.len(), 32);
        assert!(code.bytes().all(|b| CODE_CHARSET.contains(&b)));
    }

    #[test]
    fn test_generated_class_code_is_valid() {
        let code = generate_class_code();
        assert!(code.starts_with("CLS-"));
        assert!(validate_class_code(&code).is_ok());
    }
}
