use rand::Rng;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

/// Millisecond clock, injectable so tests can pin timestamps.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Source of the numeric uniqueness suffix, injectable for deterministic tests.
pub trait SuffixRandom: Send + Sync {
    /// A pseudo-random draw in `[0, 1e9)`.
    fn draw(&self) -> u32;
}

pub struct ThreadRandom;

impl SuffixRandom for ThreadRandom {
    fn draw(&self) -> u32 {
        rand::rng().random_range(0..1_000_000_000)
    }
}

/// Produces unique, filesystem-safe names for stored uploads.
///
/// The stored name is `<base>-<millis>-<random><ext>`: the sanitized title
/// (or the original filename's stem), the current time in milliseconds, and a
/// random draw truncated to at most 4 digits. No collision check is made
/// against existing files; uniqueness rests on the suffix.
pub struct FilenameAssigner {
    clock: Arc<dyn Clock>,
    random: Arc<dyn SuffixRandom>,
}

impl FilenameAssigner {
    pub fn new(clock: Arc<dyn Clock>, random: Arc<dyn SuffixRandom>) -> Self {
        Self { clock, random }
    }

    pub fn assign(&self, title: Option<&str>, original_filename: &str) -> String {
        let base = match title.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => t.to_string(),
            None => file_stem(original_filename),
        };

        let mut base = sanitize(&base);
        if base.is_empty() {
            base = "video".to_string();
        }

        let mut suffix = self.random.draw().to_string();
        suffix.truncate(4);

        let ext = file_extension(original_filename)
            .map(|e| format!(".{}", e))
            .unwrap_or_default();

        format!("{}-{}-{}{}", base, self.clock.now_millis(), suffix, ext)
    }
}

/// Collapse whitespace runs to a single hyphen, drop everything outside
/// `[A-Za-z0-9_-]`, lowercase the rest. Path-hostile characters (slashes,
/// dots, control characters) can never reach the filesystem.
fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_space = false;
    for ch in raw.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push('-');
            }
            prev_space = true;
        } else {
            prev_space = false;
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
                out.push(ch.to_ascii_lowercase());
            }
        }
    }
    out
}

/// The original filename's stem, used as the display-title fallback.
pub fn file_stem(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
        .to_string()
}

fn file_extension(filename: &str) -> Option<&str> {
    Path::new(filename).extension().and_then(|e| e.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClock(u64);

    impl Clock for FixedClock {
        fn now_millis(&self) -> u64 {
            self.0
        }
    }

    struct FixedRandom(u32);

    impl SuffixRandom for FixedRandom {
        fn draw(&self) -> u32 {
            self.0
        }
    }

    fn assigner(millis: u64, draw: u32) -> FilenameAssigner {
        FilenameAssigner::new(Arc::new(FixedClock(millis)), Arc::new(FixedRandom(draw)))
    }

    #[test]
    fn title_is_sanitized_and_suffixed() {
        let a = assigner(1700000000123, 4242);
        assert_eq!(
            a.assign(Some("My Clip"), "clip.mov"),
            "my-clip-1700000000123-4242.mov"
        );
    }

    #[test]
    fn random_draw_is_truncated_to_four_digits() {
        let a = assigner(42, 987654321);
        assert_eq!(a.assign(Some("x"), "a.mp4"), "x-42-9876.mp4");
    }

    #[test]
    fn short_draws_are_kept_whole() {
        let a = assigner(42, 7);
        assert_eq!(a.assign(Some("x"), "a.mp4"), "x-42-7.mp4");
    }

    #[test]
    fn missing_title_falls_back_to_filename_stem() {
        let a = assigner(1, 1234);
        assert_eq!(a.assign(None, "Holiday Video.mp4"), "holiday-video-1-1234.mp4");
        assert_eq!(a.assign(Some("   "), "clip.webm"), "clip-1-1234.webm");
    }

    #[test]
    fn hostile_characters_are_stripped() {
        let a = assigner(1, 1234);
        assert_eq!(
            a.assign(Some("../../etc/passwd"), "x.mp4"),
            "etcpasswd-1-1234.mp4"
        );
        assert_eq!(a.assign(Some("Ünïcode!! Tîtle?"), "x.mp4"), "ncode-ttle-1-1234.mp4");
    }

    #[test]
    fn fully_stripped_base_falls_back_to_video() {
        let a = assigner(1, 1234);
        assert_eq!(a.assign(Some("///"), "x.mp4"), "video-1-1234.mp4");
    }

    #[test]
    fn missing_extension_adds_nothing() {
        let a = assigner(1, 1234);
        assert_eq!(a.assign(Some("raw"), "capture"), "raw-1-1234");
    }

    #[test]
    fn same_title_different_clock_never_collides() {
        let names: Vec<String> = (0..100)
            .map(|ms| assigner(ms, 1234).assign(Some("dup"), "d.mp4"))
            .collect();
        let mut unique = names.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), names.len());
    }
}
