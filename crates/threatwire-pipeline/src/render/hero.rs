/// Vendor logos, matched first.
const VENDOR_IMAGES: &[(&str, &str)] = &[
    (
        "microsoft",
        "https://upload.wikimedia.org/wikipedia/commons/4/44/Microsoft_logo.svg",
    ),
    (
        "google",
        "https://upload.wikimedia.org/wikipedia/commons/2/2f/Google_2015_logo.svg",
    ),
    (
        "apple",
        "https://upload.wikimedia.org/wikipedia/commons/f/fa/Apple_logo_black.svg",
    ),
    (
        "cisco",
        "https://upload.wikimedia.org/wikipedia/commons/thumb/6/64/Cisco_logo.svg/1200px-Cisco_logo.svg.png",
    ),
    (
        "tesla",
        "https://upload.wikimedia.org/wikipedia/commons/thumb/b/bd/Tesla_Motors.svg/1200px-Tesla_Motors.svg.png",
    ),
];

/// Security themes, matched when no vendor is mentioned.
const THEME_IMAGES: &[(&str, &str)] = &[
    (
        "ransomware",
        "https://images.unsplash.com/photo-1563986768609-322da13575f3?w=800",
    ),
    (
        "phishing",
        "https://images.unsplash.com/photo-1550751827-4bd374c3f58b?w=800",
    ),
    (
        "malware",
        "https://images.unsplash.com/photo-1518709268805-4e9042af2176?w=800",
    ),
    (
        "network",
        "https://images.unsplash.com/photo-1558494949-ef010cbdcc31?w=800",
    ),
];

pub const DEFAULT_HERO_IMAGE: &str =
    "https://images.unsplash.com/photo-1555421689-491a97ff2040?w=800";

/// Picks the hero image for an article from its title and opening text.
#[must_use]
pub fn hero_image_for(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    VENDOR_IMAGES
        .iter()
        .chain(THEME_IMAGES)
        .find(|(keyword, _)| lower.contains(keyword))
        .map_or(DEFAULT_HERO_IMAGE, |&(_, url)| url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendors_win_over_themes() {
        let url = hero_image_for("Ransomware hits Microsoft Exchange servers");
        assert!(url.contains("Microsoft_logo"));
    }

    #[test]
    fn theme_when_no_vendor() {
        let url = hero_image_for("New phishing kit targets banks");
        assert_eq!(
            url,
            "https://images.unsplash.com/photo-1550751827-4bd374c3f58b?w=800"
        );
    }

    #[test]
    fn default_when_nothing_matches() {
        assert_eq!(hero_image_for("Quarterly report"), DEFAULT_HERO_IMAGE);
    }
}
