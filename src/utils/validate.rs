use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 用户名长度校验：5 <= x <= 16
    if username.len() < 5 || username.len() > 16 {
        return Err("Username length must be between 5 and 16 characters");
    }
    // 用户名格式校验：只能包含字母、数字、下划线或连字符
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

static CLASS_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{2,20}$").expect("Invalid class code regex"));

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    // 邮箱格式校验：必须包含 @ 和 .
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 课程代码，如 CS101
pub fn validate_class_code(code: &str) -> Result<(), &'static str> {
    if !CLASS_CODE_RE.is_match(code) {
        return Err("Class code must be 2-20 letters, numbers, underscores or hyphens");
    }
    Ok(())
}

/// 必填的名称类字段：去掉首尾空白后非空，且不超过 max_chars 个字符
pub fn validate_name(name: &str, max_chars: usize) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("This field is required".to_string());
    }
    if trimmed.chars().count() > max_chars {
        return Err(format!("Must be at most {max_chars} characters"));
    }
    Ok(())
}

/// 分数必须在 0-100 之间
pub fn validate_grade(grade: f64) -> Result<(), &'static str> {
    if !grade.is_finite() || !(0.0..=100.0).contains(&grade) {
        return Err("Grade must be between 0 and 100");
    }
    Ok(())
}

/// 提交的代码不能为空白，长度不超过 max_chars 个字符
pub fn validate_submission_code(code: &str, max_chars: usize) -> Result<(), String> {
    if code.trim().is_empty() {
        return Err("Code must not be empty".to_string());
    }
    let len = code.chars().count();
    if len > max_chars {
        return Err(format!(
            "Code is too long ({len} characters, maximum {max_chars})"
        ));
    }
    Ok(())
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 验证密码是否符合安全策略
///
/// 策略要求：
/// - 最小长度：8 字符
/// - 必须包含：大写字母 + 小写字母 + 数字
/// - 可选：特殊字符（增强安全性）
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    // 1. 长度检查：至少 8 个字符
    if password.len() < 8 {
        errors.push("Password must be at least 8 characters long");
    }

    // 2. 大写字母检查
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }

    // 3. 小写字母检查
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }

    // 4. 数字检查
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    // 5. 常见弱密码检查
    let weak_passwords = [
        "password",
        "12345678",
        "123456789",
        "qwerty123",
        "admin123",
        "password1",
        "Password1",
        "Qwerty123",
        "Abcd1234",
    ];
    if weak_passwords
        .iter()
        .any(|&weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// 简化的密码验证（返回 Result）
pub fn validate_password_simple(password: &str) -> Result<(), String> {
    let result = validate_password(password);
    if result.is_valid {
        Ok(())
    } else {
        Err(result.error_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("alice_01").is_ok());
        assert!(validate_username("bob").is_err());
        assert!(validate_username("has space").is_err());
    }

    #[test]
    fn test_class_code() {
        assert!(validate_class_code("CS101").is_ok());
        assert!(validate_class_code("C").is_err());
        assert!(validate_class_code("CS 101").is_err());
    }

    #[test]
    fn test_name_required() {
        assert!(validate_name("Loops", 200).is_ok());
        assert_eq!(
            validate_name("   ", 200),
            Err("This field is required".to_string())
        );
        assert!(validate_name("abcdef", 5).is_err());
    }

    #[test]
    fn test_grade_range() {
        assert!(validate_grade(0.0).is_ok());
        assert!(validate_grade(100.0).is_ok());
        assert!(validate_grade(100.5).is_err());
        assert!(validate_grade(-1.0).is_err());
        assert!(validate_grade(f64::NAN).is_err());
    }

    #[test]
    fn test_submission_code() {
        assert!(validate_submission_code("print('hi')", 100).is_ok());
        assert!(validate_submission_code(" \n\t", 100).is_err());
        // 按字符计数，不按字节
        assert!(validate_submission_code("é".repeat(10).as_str(), 10).is_ok());
        assert!(validate_submission_code("a".repeat(11).as_str(), 10).is_err());
    }

    #[test]
    fn test_valid_password() {
        assert!(validate_password("SecureP@ss1").is_valid);
        assert!(validate_password("MyP@ssw0rd").is_valid);
        assert!(validate_password("SecurePass123").is_valid);
    }

    #[test]
    fn test_short_password() {
        let result = validate_password("Ab1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must be at least 8 characters long")
        );
    }

    #[test]
    fn test_no_uppercase() {
        let result = validate_password("abcd1234");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one uppercase letter")
        );
    }

    #[test]
    fn test_no_lowercase() {
        let result = validate_password("ABCD1234");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one lowercase letter")
        );
    }

    #[test]
    fn test_no_digit() {
        let result = validate_password("AbcdEfgh");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one digit")
        );
    }

    #[test]
    fn test_common_password() {
        let result = validate_password("Password1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password is too common, please choose a stronger password")
        );
    }
}
