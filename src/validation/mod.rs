// Input validators for prompts and reference files
// Author: kelexine (https://github.com/kelexine)

use crate::error::{AppError, ErrorCode};

/// Longest accepted prompt, in characters.
pub const MAX_PROMPT_LENGTH: usize = 4000;

/// Largest accepted reference image.
pub const MAX_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

/// MIME types accepted for reference images.
pub const ALLOWED_MIME_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

/// Reject blank prompts and prompts longer than [`MAX_PROMPT_LENGTH`].
pub fn validate_prompt(prompt: &str) -> Result<(), AppError> {
    if prompt.trim().is_empty() {
        return Err(AppError::validation("Prompt cannot be empty"));
    }

    let length = prompt.chars().count();
    if length > MAX_PROMPT_LENGTH {
        return Err(AppError::validation(format!(
            "Prompt is too long ({}/{} characters)",
            length, MAX_PROMPT_LENGTH
        ))
        .with_details(format!("Length: {}/{} characters", length, MAX_PROMPT_LENGTH)));
    }

    Ok(())
}

/// Check a reference file's size, then its type.
pub fn validate_file(size_bytes: u64, mime_type: &str) -> Result<(), AppError> {
    if size_bytes > MAX_FILE_SIZE_BYTES {
        let megabytes = size_bytes as f64 / 1024.0 / 1024.0;
        return Err(AppError::file(format!("File too large ({:.2}MB)", megabytes))
            .with_details(format!("File size: {:.2}MB", megabytes))
            .with_code(ErrorCode::FileTooLarge));
    }

    if !ALLOWED_MIME_TYPES.contains(&mime_type) {
        return Err(AppError::file(format!("Invalid file type ({})", mime_type))
            .with_details(format!("File type: {}", mime_type))
            .with_code(ErrorCode::InvalidFileType));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use proptest::prelude::*;

    #[test]
    fn test_empty_prompt() {
        let err = validate_prompt("   ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.message(), "Prompt cannot be empty");
    }

    #[test]
    fn test_prompt_at_limit_is_accepted() {
        assert!(validate_prompt(&"x".repeat(MAX_PROMPT_LENGTH)).is_ok());
    }

    #[test]
    fn test_prompt_over_limit_reports_length() {
        let err = validate_prompt(&"x".repeat(4001)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.message().contains("4001"));
        assert!(err.message().contains("4000"));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        assert!(validate_prompt(&"é".repeat(MAX_PROMPT_LENGTH)).is_ok());
    }

    #[test]
    fn test_file_too_large() {
        let err = validate_file(6 * 1024 * 1024, "image/png").unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::FileTooLarge));
        assert_eq!(err.kind(), ErrorKind::File);
        assert!(err.message().contains("6.00MB"));
    }

    #[test]
    fn test_file_wrong_type() {
        let err = validate_file(1024, "image/gif").unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::InvalidFileType));
    }

    #[test]
    fn test_size_checked_before_type() {
        let err = validate_file(MAX_FILE_SIZE_BYTES + 1, "application/pdf").unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::FileTooLarge));
    }

    #[test]
    fn test_allowed_files() {
        for mime in ALLOWED_MIME_TYPES {
            assert!(validate_file(MAX_FILE_SIZE_BYTES, mime).is_ok());
        }
    }

    proptest! {
        #[test]
        fn prop_non_blank_prompts_within_limit_pass(prompt in "[a-z]{1,4000}") {
            prop_assert!(validate_prompt(&prompt).is_ok());
        }

        #[test]
        fn prop_blank_prompts_fail(prompt in "[ \t\n]{0,64}") {
            prop_assert!(validate_prompt(&prompt).is_err());
        }

        #[test]
        fn prop_overlong_prompts_embed_length(extra in 1usize..500) {
            let length = MAX_PROMPT_LENGTH + extra;
            let err = validate_prompt(&"y".repeat(length)).unwrap_err();
            prop_assert!(err.message().contains(&length.to_string()));
            prop_assert!(err.message().contains("4000"));
        }

        #[test]
        fn prop_oversized_files_fail_with_size_code(size in (MAX_FILE_SIZE_BYTES + 1)..(64 * 1024 * 1024u64)) {
            let err = validate_file(size, "image/webp").unwrap_err();
            prop_assert_eq!(err.code(), Some(ErrorCode::FileTooLarge));
        }
    }
}
