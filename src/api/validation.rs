use std::path::Path;

use crate::api::errors::ApiError;

pub(crate) fn validate_upload_filename(
    filename: &str,
    allowed_extensions: &[String],
) -> Result<(), ApiError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .ok_or_else(|| ApiError::BadRequest("File must have an extension".to_string()))?;

    if !allowed_extensions.iter().any(|allowed| allowed == &extension) {
        return Err(ApiError::BadRequest(format!("File extension '{extension}' is not allowed")));
    }

    Ok(())
}

pub(crate) fn sanitized_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '_' || *c == '-')
        .collect();

    if sanitized.is_empty() {
        "upload".to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        vec!["png".to_string(), "txt".to_string()]
    }

    #[test]
    fn accepts_listed_extension_case_insensitively() {
        assert!(validate_upload_filename("photo.PNG", &allowed()).is_ok());
        assert!(validate_upload_filename("note.txt", &allowed()).is_ok());
    }

    #[test]
    fn rejects_unlisted_extension() {
        let result = validate_upload_filename("run.exe", &allowed());
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn rejects_missing_extension() {
        let result = validate_upload_filename("README", &allowed());
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn sanitizes_path_separators_out_of_filenames() {
        assert_eq!(sanitized_filename("../../etc/passwd"), "....etcpasswd");
        assert_eq!(sanitized_filename("r e p o r t.pdf"), "report.pdf");
        assert_eq!(sanitized_filename("///"), "upload");
    }
}
