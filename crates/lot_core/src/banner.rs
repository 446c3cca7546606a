//! Looping title banner: one text fades in over a half-cycle, fades back out
//! over the next, then the banner swaps to the other text and picks a new
//! colour to drift toward.

use rand::Rng;

pub const HALF_CYCLE_SECS: f32 = 3.0;
const COLOR_APPROACH_RATE: f32 = 2.0;
const TARGET_CHANNEL_MIN: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerText {
    Primary,
    Secondary,
}

impl BannerText {
    pub fn label(self) -> &'static str {
        match self {
            Self::Primary => "PARKING",
            Self::Secondary => "SERVIS",
        }
    }

    pub fn other(self) -> Self {
        match self {
            Self::Primary => Self::Secondary,
            Self::Secondary => Self::Primary,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TitleBanner {
    pub current_text: BannerText,
    pub current_color: [f32; 3],
    pub target_color: [f32; 3],
    pub transition_progress: f32,
    pub reverse: bool,
}

impl TitleBanner {
    pub fn new() -> Self {
        Self {
            current_text: BannerText::Primary,
            current_color: [1.0, 1.0, 1.0],
            target_color: [1.0, 0.0, 0.0],
            transition_progress: 0.0,
            reverse: false,
        }
    }

    pub fn tick(&mut self, dt: f32, rng: &mut impl Rng) {
        let direction = if self.reverse { -1.0 } else { 1.0 };
        self.transition_progress += direction * dt / HALF_CYCLE_SECS;

        if self.transition_progress >= 1.0 {
            self.transition_progress = 1.0;
            self.reverse = true;
        } else if self.transition_progress <= 0.0 {
            self.transition_progress = 0.0;
            // Only a fade-out that reaches zero swaps the text.
            if self.reverse {
                self.reverse = false;
                self.current_text = self.current_text.other();
                self.target_color = [
                    rng.random_range(TARGET_CHANNEL_MIN..=1.0),
                    rng.random_range(TARGET_CHANNEL_MIN..=1.0),
                    rng.random_range(TARGET_CHANNEL_MIN..=1.0),
                ];
            }
        }

        for (color, target) in self.current_color.iter_mut().zip(self.target_color) {
            *color += (target - *color) * COLOR_APPROACH_RATE * dt;
        }
    }

    /// Alphas of the (primary, secondary) texts. They move in opposite
    /// directions; only the active one is drawn, fully opaque at the top of
    /// the cycle.
    pub fn text_alphas(&self) -> (f32, f32) {
        let active = self.transition_progress;
        match self.current_text {
            BannerText::Primary => (active, 1.0 - active),
            BannerText::Secondary => (1.0 - active, active),
        }
    }

    pub fn displayed_alpha(&self) -> f32 {
        let (primary, secondary) = self.text_alphas();
        match self.current_text {
            BannerText::Primary => primary,
            BannerText::Secondary => secondary,
        }
    }

    pub fn displayed_color(&self) -> [f32; 4] {
        let [r, g, b] = self.current_color;
        [r, g, b, self.displayed_alpha()]
    }
}

impl Default for TitleBanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn progress_stays_bounded_for_huge_deltas() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut banner = TitleBanner::new();
        for dt in [0.0, 1000.0, 0.5, 7.0, 1e6, 0.016, 3.0] {
            banner.tick(dt, &mut rng);
            assert!((0.0..=1.0).contains(&banner.transition_progress));
        }
    }

    #[test]
    fn text_flips_only_on_down_crossing() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut banner = TitleBanner::new();

        // Reaching the top reverses direction without swapping text.
        banner.tick(HALF_CYCLE_SECS, &mut rng);
        assert_eq!(banner.transition_progress, 1.0);
        assert!(banner.reverse);
        assert_eq!(banner.current_text, BannerText::Primary);

        banner.tick(HALF_CYCLE_SECS / 2.0, &mut rng);
        assert_eq!(banner.current_text, BannerText::Primary);

        banner.tick(HALF_CYCLE_SECS, &mut rng);
        assert_eq!(banner.transition_progress, 0.0);
        assert!(!banner.reverse);
        assert_eq!(banner.current_text, BannerText::Secondary);
    }

    #[test]
    fn zero_delta_at_rest_does_not_flip() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut banner = TitleBanner::new();
        for _ in 0..5 {
            banner.tick(0.0, &mut rng);
        }
        assert_eq!(banner.current_text, BannerText::Primary);
    }

    #[test]
    fn full_cycles_alternate_text() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut banner = TitleBanner::new();
        let mut flips = 0;
        let mut last = banner.current_text;
        // 6 s per full cycle at 60 fps for three cycles, plus slack.
        for _ in 0..(60 * 6 * 3 + 30) {
            banner.tick(1.0 / 60.0, &mut rng);
            if banner.current_text != last {
                flips += 1;
                last = banner.current_text;
            }
        }
        assert_eq!(flips, 3);
    }

    #[test]
    fn new_target_channels_in_range() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut banner = TitleBanner::new();
        for _ in 0..20 {
            banner.tick(HALF_CYCLE_SECS, &mut rng);
            banner.tick(HALF_CYCLE_SECS, &mut rng);
            assert!(banner
                .target_color
                .iter()
                .all(|c| (TARGET_CHANNEL_MIN..=1.0).contains(c)));
        }
    }

    #[test]
    fn color_approaches_target_exponentially() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut banner = TitleBanner::new();
        banner.tick(0.1, &mut rng);
        // white -> red: green/blue shrink by factor (1 - 2 * 0.1)
        assert!((banner.current_color[0] - 1.0).abs() < 1e-6);
        assert!((banner.current_color[1] - 0.8).abs() < 1e-6);
        assert!((banner.current_color[2] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn active_text_alpha_tracks_progress() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut banner = TitleBanner::new();
        banner.tick(HALF_CYCLE_SECS * 0.25, &mut rng);
        assert!((banner.displayed_alpha() - 0.25).abs() < 1e-5);
        let (primary, secondary) = banner.text_alphas();
        assert!((primary - 0.25).abs() < 1e-5);
        assert!((secondary - 0.75).abs() < 1e-5);
        assert_eq!(banner.displayed_color()[3], banner.displayed_alpha());
    }
}
