//! Output sinks for presented bitmaps

use serde_json::{json, Value};

/// Mime type under which presented bitmaps are published
pub const IMAGE_BITMAP_MIME: &str = "application/html-imagebitmap";

/// A presented frame and the window title it belongs to
#[derive(Debug)]
pub struct BitmapOutput<'a, B> {
    pub bitmap: &'a B,
    pub title: &'a str,
}

impl<'a, B> BitmapOutput<'a, B> {
    pub fn new(bitmap: &'a B, title: &'a str) -> Self {
        Self { bitmap, title }
    }

    pub fn mime_type(&self) -> &'static str {
        IMAGE_BITMAP_MIME
    }

    /// Display metadata, `{"title": ...}`
    pub fn metadata(&self) -> Value {
        json!({ "title": self.title })
    }
}

/// Receives every bitmap a canvas presents
pub trait OutputSink<B> {
    fn display(&mut self, output: &BitmapOutput<'_, B>);
}

impl<B, F> OutputSink<B> for F
where
    F: FnMut(&BitmapOutput<'_, B>),
{
    fn display(&mut self, output: &BitmapOutput<'_, B>) {
        self(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_carries_the_title() {
        let bitmap = vec![1u8, 2, 3];
        let output = BitmapOutput::new(&bitmap, "Figure 1");
        assert_eq!(output.mime_type(), "application/html-imagebitmap");
        assert_eq!(output.metadata().to_string(), r#"{"title":"Figure 1"}"#);
    }

    #[test]
    fn closures_are_sinks() {
        let mut titles = Vec::new();
        {
            let mut sink = |output: &BitmapOutput<'_, u32>| titles.push(output.title.to_string());
            sink.display(&BitmapOutput::new(&7, "a"));
            sink.display(&BitmapOutput::new(&8, "b"));
        }
        assert_eq!(titles, ["a", "b"]);
    }
}
