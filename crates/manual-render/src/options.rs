/// Presentation knobs for the HTML emitter.
///
/// None of these affect which Markdown constructs are recognised; they only
/// control the attributes written onto synthesized links and images.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Browsing context for links. `None` omits `target` and `rel`.
    pub link_target: Option<String>,
    /// Class marking images for click-to-enlarge. `None` omits `class`.
    pub image_class: Option<String>,
    /// Replace script-capable URL schemes with `#`.
    pub safe_urls: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            link_target: Some("_blank".to_owned()),
            image_class: Some("md-image".to_owned()),
            safe_urls: true,
        }
    }
}

impl RenderOptions {
    pub fn with_link_target(mut self, target: impl Into<String>) -> Self {
        self.link_target = Some(target.into());
        self
    }

    pub fn without_link_target(mut self) -> Self {
        self.link_target = None;
        self
    }

    pub fn with_image_class(mut self, class: impl Into<String>) -> Self {
        self.image_class = Some(class.into());
        self
    }

    pub fn without_image_class(mut self) -> Self {
        self.image_class = None;
        self
    }

    pub fn with_safe_urls(mut self, enabled: bool) -> Self {
        self.safe_urls = enabled;
        self
    }
}
