use unicode_segmentation::UnicodeSegmentation;

const MIN_CHAR_LENGTH: usize = 2;
const MAX_CHAR_LENGTH: usize = 256;

#[derive(Debug, Clone, serde::Serialize)]
pub struct UserName(String);

impl UserName {
    pub fn parse(name: String) -> Result<UserName, String> {
        let length = name.graphemes(true).count();

        if length < MIN_CHAR_LENGTH {
            return Err(format!(
                "Name must be at least {} characters",
                MIN_CHAR_LENGTH
            ));
        }

        if length > MAX_CHAR_LENGTH {
            return Err(format!(
                "Name must be at most {} characters",
                MAX_CHAR_LENGTH
            ));
        }

        Ok(Self(name))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
