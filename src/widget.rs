// ABOUTME: Generates the iframe snippet for embedding the station map elsewhere
// ABOUTME: Also computes the clamped size of the in-page preview

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Pixels as digits, or a CSS percentage such as `100%`.
    pub width: String,
    pub height: String,
    pub include_search: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            width: "800".to_string(),
            height: "600".to_string(),
            include_search: true,
        }
    }
}

/// `origin + pathname` of the map page with a trailing `index.html` removed.
pub fn base_url(origin: &str, pathname: &str) -> String {
    format!("{}{}", origin, pathname.replace("index.html", ""))
}

fn clamp_px(value: &str, max: u32) -> String {
    let px = value
        .trim()
        .trim_end_matches("px")
        .parse::<u32>()
        .map(|v| v.min(max))
        .unwrap_or(max);
    format!("{}px", px)
}

impl WidgetConfig {
    pub fn widget_url(&self, base: &str) -> String {
        let search = if self.include_search { "" } else { "?hideSearch=true" };
        format!("{}widget.html{}", base, search)
    }

    pub fn embed_code(&self, base: &str) -> String {
        let url = self.widget_url(base);
        format!(
            r#"<!-- Wildvogelhilfe map widget -->
<iframe
    src="{url}"
    width="{width}"
    height="{height}"
    frameborder="0"
    style="border: 1px solid #ddd; border-radius: 8px; max-width: 100%;"
    title="Wildvogelhilfe map"
    loading="lazy">
    <p>Your browser does not support iframes.
    <a href="{url}" target="_blank">Open the map in a new window</a></p>
</iframe>"#,
            url = url,
            width = self.width,
            height = self.height
        )
    }

    /// CSS width/height of the preview frame: at most 800px by 500px.
    pub fn preview_size(&self) -> (String, String) {
        let width = if self.width.trim() == "100%" {
            "100%".to_string()
        } else {
            clamp_px(&self.width, 800)
        };
        (width, clamp_px(&self.height, 500))
    }
}
