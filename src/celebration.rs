use rand::seq::SliceRandom;
use rand::Rng;
use std::time::{Duration, Instant};

/// One cannon shot of confetti
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfettiBurst {
    /// Launch point as a fraction of the screen (0.0..=1.0 on both axes)
    pub origin: (f64, f64),
    /// Launch direction in degrees, 90 is straight up
    pub angle: f64,
    /// Width of the launch cone in degrees
    pub spread: f64,
    pub particle_count: usize,
    pub colors: [(u8, u8, u8); 2],
    pub delay: Duration,
}

/// Left cannon fires immediately, right cannon 200ms later.
pub const PERFECT_SCORE_BURSTS: [ConfettiBurst; 2] = [
    ConfettiBurst {
        origin: (0.0, 0.8),
        angle: 60.0,
        spread: 55.0,
        particle_count: 100,
        colors: [(255, 215, 0), (255, 0, 255)],
        delay: Duration::from_millis(0),
    },
    ConfettiBurst {
        origin: (1.0, 0.8),
        angle: 120.0,
        spread: 55.0,
        particle_count: 100,
        colors: [(0, 255, 0), (255, 69, 0)],
        delay: Duration::from_millis(200),
    },
];

const GRAVITY: f64 = 15.0;
// terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct ConfettiParticle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color: (u8, u8, u8),
    pub age: f64,
    pub max_age: f64,
}

impl ConfettiParticle {
    fn launch(burst: &ConfettiBurst, width: f64, height: f64, rng: &mut impl Rng) -> Self {
        let half_spread = burst.spread / 2.0;
        let angle = (burst.angle + rng.gen_range(-half_spread..=half_spread)).to_radians();
        let speed = rng.gen_range(8.0..16.0);

        Self {
            x: burst.origin.0 * width,
            y: burst.origin.1 * height,
            vel_x: angle.cos() * speed * CELL_ASPECT,
            vel_y: -angle.sin() * speed,
            symbol: *['▪', '▬', '●', '◆', '*', '✦']
                .choose(rng)
                .unwrap_or(&'▪'),
            color: *burst.colors.choose(rng).unwrap_or(&burst.colors[0]),
            age: 0.0,
            max_age: rng.gen_range(1.5..3.0),
        }
    }

    fn update(&mut self, dt: f64) -> bool {
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_y += GRAVITY * dt;
        self.vel_x *= 0.97;

        self.age += dt;
        self.age < self.max_age
    }

    /// 1.0 when launched, fading to 0.0 at the end of its life
    pub fn alpha(&self) -> f64 {
        (1.0 - self.age / self.max_age).clamp(0.0, 1.0)
    }
}

/// Confetti animation played over the results screen on a perfect score
#[derive(Debug)]
pub struct CelebrationAnimation {
    pub particles: Vec<ConfettiParticle>,
    pub started_at: Instant,
    pub duration: Duration,
    pub is_active: bool,
    pub terminal_width: f64,
    pub terminal_height: f64,
    pending: Vec<ConfettiBurst>,
}

impl CelebrationAnimation {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            started_at: Instant::now(),
            duration: Duration::from_secs(3),
            is_active: false,
            terminal_width: 80.0,
            terminal_height: 24.0,
            pending: Vec::new(),
        }
    }

    pub fn start_at(&mut self, width: u16, height: u16, now: Instant) {
        self.particles.clear();
        self.started_at = now;
        self.is_active = true;
        self.terminal_width = width as f64;
        self.terminal_height = height as f64;
        self.pending = PERFECT_SCORE_BURSTS.to_vec();

        self.launch_due(Duration::ZERO);
    }

    pub fn stop(&mut self) {
        self.is_active = false;
        self.particles.clear();
        self.pending.clear();
    }

    #[cfg(test)]
    fn pending_bursts(&self) -> usize {
        self.pending.len()
    }

    pub fn update_at(&mut self, now: Instant) {
        if !self.is_active {
            return;
        }

        let elapsed = now.saturating_duration_since(self.started_at);
        if elapsed >= self.duration {
            self.stop();
            return;
        }

        self.launch_due(elapsed);

        let dt = 0.1; // Fixed timestep for animation
        let buffer = 5.0;
        let (width, height) = (self.terminal_width, self.terminal_height);
        self.particles.retain_mut(|particle| {
            let still_alive = particle.update(dt);
            let off_screen =
                particle.y > height + buffer || particle.x < -buffer || particle.x > width + buffer;
            still_alive && !off_screen
        });
    }

    fn launch_due(&mut self, elapsed: Duration) {
        let mut rng = rand::thread_rng();
        let (width, height) = (self.terminal_width, self.terminal_height);

        let (due, later): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|burst| burst.delay <= elapsed);
        self.pending = later;

        for burst in due {
            for _ in 0..burst.particle_count {
                self.particles
                    .push(ConfettiParticle::launch(&burst, width, height, &mut rng));
            }
        }
    }
}

impl Default for CelebrationAnimation {
    fn default() -> Self {
        Self::new()
    }
}
