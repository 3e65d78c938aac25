use serde::Serialize;

/// Ordered, append-only list of command line tokens.
///
/// Every option category of an input or output (generic options, audio, audio filters,
/// video, video filters, size filters) is backed by one `ArgList`. Tokens are never
/// deduplicated or reordered; conflicting options are left for ffmpeg to resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ArgList {
    tokens: Vec<String>,
}

impl ArgList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append tokens at the end, keeping their order
    pub fn append<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tokens.extend(tokens.into_iter().map(Into::into));
    }

    /// Append a single token
    pub fn push<S: Into<String>>(&mut self, token: S) {
        self.tokens.push(token.into());
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.tokens.clone()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl<'a> IntoIterator for &'a ArgList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_call_order() {
        let mut args = ArgList::new();
        args.append(["-acodec", "aac"]);
        args.append(vec!["-b:a".to_string(), "128k".to_string()]);
        args.push("-an");

        assert_eq!(args.as_slice(), &["-acodec", "aac", "-b:a", "128k", "-an"]);
        assert_eq!(args.len(), 5);
    }

    #[test]
    fn test_append_keeps_duplicates() {
        let mut args = ArgList::new();
        args.append(["-acodec", "aac"]);
        args.append(["-acodec", "libmp3lame"]);

        assert_eq!(args.to_vec(), vec!["-acodec", "aac", "-acodec", "libmp3lame"]);
    }

    #[test]
    fn test_clear_then_append() {
        let mut args = ArgList::new();
        args.append(["-vcodec", "libx264"]);
        args.clear();
        assert!(args.is_empty());

        args.append(["-vn"]);
        assert_eq!(args.to_vec(), vec!["-vn"]);
    }

    #[test]
    fn test_empty_append_is_noop() {
        let mut args = ArgList::new();
        args.append(Vec::<String>::new());
        assert!(args.is_empty());
    }
}
