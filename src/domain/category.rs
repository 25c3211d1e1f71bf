/// Static category-to-keywords mapping used by the classifier. Entry order
/// is significant: when two categories tie on keyword hits, the one listed
/// first wins. Changing the table is a redeploy, not a runtime concern.
#[derive(Debug, Clone)]
pub struct CategoryKeywordTable {
    entries: Vec<(String, Vec<String>)>,
}

impl CategoryKeywordTable {
    pub fn new(entries: Vec<(String, Vec<String>)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(category, keywords)| (category.as_str(), keywords.as_slice()))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(category, _)| category.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The table shipped with the marketplace catalog.
    pub fn builtin() -> Self {
        fn keywords(words: &[&str]) -> Vec<String> {
            words.iter().map(|w| w.to_string()).collect()
        }

        Self::new(vec![
            (
                "design".to_string(),
                keywords(&[
                    "logo", "design", "banner", "illustration", "branding", "poster", "flyer",
                    "icon", "mockup", "figma",
                ]),
            ),
            (
                "development".to_string(),
                keywords(&[
                    "website", "app", "backend", "frontend", "api", "bot", "database", "script",
                    "landing", "wordpress",
                ]),
            ),
            (
                "writing".to_string(),
                keywords(&[
                    "article", "blog", "copywriting", "text", "translation", "resume", "editing",
                    "proofreading",
                ]),
            ),
            (
                "marketing".to_string(),
                keywords(&[
                    "marketing", "seo", "ads", "smm", "promotion", "instagram", "campaign",
                    "audience",
                ]),
            ),
            (
                "video".to_string(),
                keywords(&[
                    "video", "animation", "montage", "intro", "editing", "reels", "youtube",
                ]),
            ),
            (
                "audio".to_string(),
                keywords(&[
                    "music", "voiceover", "podcast", "jingle", "mixing", "mastering",
                ]),
            ),
        ])
    }
}

impl Default for CategoryKeywordTable {
    fn default() -> Self {
        Self::builtin()
    }
}
