use indexmap::IndexSet;
use serde::Deserialize;

/// Paths known to exist at bundle time, in the order the packaging step
/// enumerated them. The alternate-image contract depends on that order, so
/// the set is insertion-ordered.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ImageManifest {
    paths: IndexSet<String>,
}

impl ImageManifest {
    #[must_use]
    pub fn new(paths: impl IntoIterator<Item = String>) -> Self {
        Self {
            paths: paths.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Every image bundled for one route, in display order.
///
/// The base name is the service code with `:` normalized to `_` (colons are
/// not valid in asset filenames). Preference order: the primary jpg, else the
/// primary png, then `-alt*` variants — jpg alternates before png alternates,
/// each in manifest iteration order. Pure lookup; nothing touches the
/// filesystem at call time.
#[must_use]
pub fn resolve_images(
    manifest: &ImageManifest,
    dataset_id: &str,
    service_code: &str,
) -> Vec<String> {
    let base = service_code.replace(':', "_");
    let dir = format!("images/{dataset_id}/");

    let mut images = Vec::new();

    let primary_jpg = format!("{dir}{base}.jpg");
    let primary_png = format!("{dir}{base}.png");
    if manifest.contains(&primary_jpg) {
        images.push(primary_jpg);
    } else if manifest.contains(&primary_png) {
        images.push(primary_png);
    }

    let alt_prefix = format!("{dir}{base}-alt");
    for extension in [".jpg", ".png"] {
        for path in manifest.iter() {
            if path.starts_with(&alt_prefix) && path.ends_with(extension) {
                images.push(path.to_string());
            }
        }
    }

    images
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(paths: &[&str]) -> ImageManifest {
        ImageManifest::new(paths.iter().map(ToString::to_string))
    }

    #[test]
    fn test_primary_jpg_preferred_over_png() {
        let m = manifest(&["images/5/12_A.png", "images/5/12_A.jpg"]);
        assert_eq!(resolve_images(&m, "5", "12:A"), vec!["images/5/12_A.jpg"]);
    }

    #[test]
    fn test_png_fallback_when_no_jpg() {
        let m = manifest(&["images/5/12_A.png"]);
        assert_eq!(resolve_images(&m, "5", "12:A"), vec!["images/5/12_A.png"]);
    }

    #[test]
    fn test_colon_normalized_to_underscore() {
        let m = manifest(&["images/5/12_A.jpg"]);
        assert_eq!(resolve_images(&m, "5", "12:A"), vec!["images/5/12_A.jpg"]);
        assert!(resolve_images(&m, "5", "12-A").is_empty());
    }

    #[test]
    fn test_alternates_follow_primary() {
        let m = manifest(&[
            "images/7/PB0001_44-alt1.jpg",
            "images/7/PB0001_44.jpg",
            "images/7/PB0001_44-alt2.jpg",
        ]);

        assert_eq!(
            resolve_images(&m, "7", "PB0001:44"),
            vec![
                "images/7/PB0001_44.jpg",
                "images/7/PB0001_44-alt1.jpg",
                "images/7/PB0001_44-alt2.jpg",
            ]
        );
    }

    #[test]
    fn test_alternate_tiers_jpg_before_png_in_manifest_order() {
        let m = manifest(&[
            "images/7/X_9-alt1.png",
            "images/7/X_9-alt2.jpg",
            "images/7/X_9.png",
            "images/7/X_9-alt1.jpg",
        ]);

        assert_eq!(
            resolve_images(&m, "7", "X:9"),
            vec![
                "images/7/X_9.png",
                "images/7/X_9-alt2.jpg",
                "images/7/X_9-alt1.jpg",
                "images/7/X_9-alt1.png",
            ]
        );
    }

    #[test]
    fn test_no_match_yields_empty() {
        let m = manifest(&["images/5/12_A.jpg"]);
        assert!(resolve_images(&m, "6", "12:A").is_empty());
        assert!(resolve_images(&m, "5", "99").is_empty());
        assert!(resolve_images(&ImageManifest::default(), "5", "12:A").is_empty());
    }

    #[test]
    fn test_other_routes_alternates_not_picked_up() {
        let m = manifest(&["images/5/12_A-alt1.jpg", "images/5/12_AB-alt1.jpg"]);
        assert_eq!(
            resolve_images(&m, "5", "12:A"),
            vec!["images/5/12_A-alt1.jpg"]
        );
    }
}
