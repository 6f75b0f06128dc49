use rand::seq::SliceRandom;
use rand::Rng;

/// One confetti particle of the per-word success burst
#[derive(Debug, Clone)]
pub struct ConfettiParticle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
}

impl ConfettiParticle {
    fn new(x: f64, y: f64) -> Self {
        let mut rng = rand::thread_rng();

        Self {
            x,
            y,
            vel_x: rng.gen_range(-6.0..6.0),
            vel_y: rng.gen_range(-5.0..-1.5),
            symbol: *['✨', '⭐', '★', '✓', '·', '*']
                .choose(&mut rng)
                .unwrap_or(&'✨'),
            color_index: rng.gen_range(0..7),
            age: 0.0,
            max_age: rng.gen_range(1.0..2.0),
        }
    }

    /// Advance the particle; false once it has burned out
    fn update(&mut self, dt: f64) -> bool {
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_y += 12.0 * dt; // gravity pulls the confetti back down

        self.age += dt;
        self.age < self.max_age
    }
}

/// Confetti burst shown when a word is read correctly. Fire-and-forget:
/// the game starts it and the tick loop drives it until it goes inactive.
#[derive(Debug)]
pub struct CelebrationAnimation {
    pub particles: Vec<ConfettiParticle>,
    pub praise: &'static str,
    pub is_active: bool,
    elapsed: f64,
    duration: f64,
    width: f64,
    height: f64,
}

const PRAISE_WORDS: [&str; 6] = ["VÝBORNĚ!", "SKVĚLE!", "PARÁDA!", "SUPER!", "BRAVO!", "KRÁSA!"];

impl CelebrationAnimation {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            praise: PRAISE_WORDS[0],
            is_active: false,
            elapsed: 0.0,
            duration: 1.8,
            width: 80.0,
            height: 24.0,
        }
    }

    /// Launch a burst around the displayed word
    pub fn start(&mut self, width: u16, height: u16) {
        let mut rng = rand::thread_rng();

        self.particles.clear();
        self.elapsed = 0.0;
        self.is_active = true;
        self.width = width as f64;
        self.height = height as f64;
        self.praise = PRAISE_WORDS.choose(&mut rng).copied().unwrap_or(PRAISE_WORDS[0]);

        let center_x = self.width / 2.0;
        let center_y = self.height / 2.0;

        for _ in 0..30 {
            let offset_x = rng.gen_range(-12.0..12.0);
            let offset_y = rng.gen_range(-4.0..4.0);
            self.particles
                .push(ConfettiParticle::new(center_x + offset_x, center_y + offset_y));
        }
    }

    /// One animation step, called from the tick handler
    pub fn update(&mut self, dt: f64) {
        if !self.is_active {
            return;
        }

        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.is_active = false;
            self.particles.clear();
            return;
        }

        let width = self.width;
        let height = self.height;
        self.particles.retain_mut(|particle| {
            let alive = particle.update(dt);
            let buffer = 3.0;
            let off_screen = particle.y > height + buffer
                || particle.x < -buffer
                || particle.x > width + buffer;
            alive && !off_screen
        });
    }
}

impl Default for CelebrationAnimation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_falls_under_gravity() {
        let mut particle = ConfettiParticle::new(10.0, 10.0);
        let initial_vel_y = particle.vel_y;

        let alive = particle.update(0.1);

        assert!(alive);
        assert!(particle.vel_y > initial_vel_y);
    }

    #[test]
    fn test_particle_burns_out() {
        let mut particle = ConfettiParticle::new(10.0, 10.0);

        let mut alive = true;
        for _ in 0..100 {
            alive = particle.update(0.1);
            if !alive {
                break;
            }
        }
        assert!(!alive);
    }

    #[test]
    fn test_celebration_starts_inactive() {
        let celebration = CelebrationAnimation::new();
        assert!(!celebration.is_active);
        assert!(celebration.particles.is_empty());
    }

    #[test]
    fn test_celebration_start_spawns_particles() {
        let mut celebration = CelebrationAnimation::new();

        celebration.start(80, 24);

        assert!(celebration.is_active);
        assert!(!celebration.particles.is_empty());
        assert!(PRAISE_WORDS.contains(&celebration.praise));
    }

    #[test]
    fn test_celebration_expires() {
        let mut celebration = CelebrationAnimation::new();
        celebration.start(80, 24);

        for _ in 0..25 {
            celebration.update(0.1);
        }

        assert!(!celebration.is_active);
        assert!(celebration.particles.is_empty());
    }

    #[test]
    fn test_celebration_restart_resets_clock() {
        let mut celebration = CelebrationAnimation::new();
        celebration.start(80, 24);

        for _ in 0..10 {
            celebration.update(0.1);
        }
        celebration.start(80, 24);

        assert!(celebration.is_active);
        // A fresh burst survives a couple more steps
        celebration.update(0.1);
        assert!(celebration.is_active);
    }

    #[test]
    fn test_offscreen_particles_removed() {
        let mut celebration = CelebrationAnimation::new();
        celebration.start(20, 10);

        celebration.particles.push(ConfettiParticle::new(100.0, 100.0));
        celebration.update(0.1);

        for particle in &celebration.particles {
            assert!(particle.x <= 23.0 && particle.y <= 13.0);
        }
    }
}
