use crate::foundation::error::{ReelError, ReelResult};
use crate::reel::config::{ImageEffect, ReelConfig, TextEffect};

/// Opacity of a clip `local_t` seconds in, fading in and out over `fade` seconds each.
pub fn fade_opacity(local_t: f64, duration: f64, fade: f64) -> f32 {
    if fade <= 0.0 {
        return 1.0;
    }
    let fade_in = local_t / fade;
    let fade_out = (duration - local_t) / fade;
    fade_in.min(fade_out).clamp(0.0, 1.0) as f32
}

/// A time span on the reel, in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clip {
    pub start: f64,
    pub duration: f64,
    /// Fade length at both ends, if the clip fades.
    pub fade: Option<f64>,
}

impl Clip {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    pub fn is_active(&self, t: f64) -> bool {
        t >= self.start && t < self.end()
    }

    /// Opacity at reel time `t`; zero outside the clip.
    pub fn opacity(&self, t: f64) -> f32 {
        if !self.is_active(t) {
            return 0.0;
        }
        match self.fade {
            Some(fade) => fade_opacity(t - self.start, self.duration, fade),
            None => 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CaptionClip {
    /// Line number of the caption in the script.
    pub index: usize,
    pub text: String,
    pub clip: Clip,
}

/// When every slide and caption is on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    pub duration: f64,
    pub slides: Vec<Clip>,
    pub captions: Vec<CaptionClip>,
}

impl Timeline {
    /// Lay out `slide_count` slides back to back, with caption `i` starting alongside slide `i`.
    ///
    /// Captions that would start at or after the end of the reel are dropped.
    pub fn build(slide_count: usize, captions: &[String], cfg: &ReelConfig) -> ReelResult<Self> {
        if slide_count == 0 {
            return Err(ReelError::validation("a reel needs at least one image"));
        }
        let duration = slide_count as f64 * cfg.image_duration;

        let image_fade = (cfg.image_effect == ImageEffect::Fade).then_some(cfg.fade_secs);
        let slides = (0..slide_count)
            .map(|i| Clip {
                start: i as f64 * cfg.image_duration,
                duration: cfg.image_duration,
                fade: image_fade,
            })
            .collect();

        let text_fade = (cfg.text_effect == TextEffect::Fade).then_some(cfg.fade_secs);
        let mut caption_clips = Vec::with_capacity(captions.len());
        for (index, text) in captions.iter().enumerate() {
            let start = index as f64 * cfg.image_duration;
            if start >= duration {
                tracing::warn!(
                    index,
                    start,
                    duration,
                    caption = %text,
                    "caption starts after the last image, dropping"
                );
                continue;
            }
            caption_clips.push(CaptionClip {
                index,
                text: text.clone(),
                clip: Clip {
                    start,
                    duration: cfg.text_duration,
                    fade: text_fade,
                },
            });
        }

        Ok(Self {
            duration,
            slides,
            captions: caption_clips,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captions(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("caption {i}")).collect()
    }

    #[test]
    fn fade_ramps() {
        assert_eq!(fade_opacity(0.0, 4.0, 0.5), 0.0);
        assert_eq!(fade_opacity(0.25, 4.0, 0.5), 0.5);
        assert_eq!(fade_opacity(2.0, 4.0, 0.5), 1.0);
        assert_eq!(fade_opacity(3.75, 4.0, 0.5), 0.5);
        assert_eq!(fade_opacity(4.0, 4.0, 0.5), 0.0);
        assert_eq!(fade_opacity(0.0, 4.0, 0.0), 1.0);
    }

    #[test]
    fn clips_are_half_open() {
        let clip = Clip {
            start: 4.0,
            duration: 4.0,
            fade: None,
        };
        assert!(!clip.is_active(3.99));
        assert!(clip.is_active(4.0));
        assert!(!clip.is_active(8.0));
        assert_eq!(clip.opacity(5.0), 1.0);
        assert_eq!(clip.opacity(9.0), 0.0);
    }

    #[test]
    fn slides_and_captions_share_start_times() {
        let cfg = ReelConfig::default();
        let tl = Timeline::build(3, &captions(2), &cfg).unwrap();
        assert_eq!(tl.duration, 12.0);
        let starts: Vec<f64> = tl.slides.iter().map(|c| c.start).collect();
        assert_eq!(starts, vec![0.0, 4.0, 8.0]);
        assert_eq!(tl.captions.len(), 2);
        assert_eq!(tl.captions[1].clip.start, 4.0);
        assert_eq!(tl.captions[1].clip.duration, 3.5);
        assert!(tl.slides.iter().all(|c| c.fade.is_none()));
    }

    #[test]
    fn surplus_captions_are_dropped() {
        let cfg = ReelConfig::default();
        let tl = Timeline::build(2, &captions(5), &cfg).unwrap();
        let kept: Vec<usize> = tl.captions.iter().map(|c| c.index).collect();
        assert_eq!(kept, vec![0, 1]);
    }

    #[test]
    fn effects_enable_fades() {
        let cfg = ReelConfig {
            image_effect: ImageEffect::Fade,
            text_effect: TextEffect::Fade,
            ..ReelConfig::default()
        };
        let tl = Timeline::build(1, &captions(1), &cfg).unwrap();
        assert_eq!(tl.slides[0].fade, Some(0.5));
        assert_eq!(tl.captions[0].clip.fade, Some(0.5));
        assert_eq!(tl.captions[0].clip.opacity(0.0), 0.0);
    }

    #[test]
    fn no_slides_is_an_error() {
        assert!(Timeline::build(0, &captions(1), &ReelConfig::default()).is_err());
    }
}
