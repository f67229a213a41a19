//! Synthetic IMU source for the headless runner and the simulator.
//!
//! Sweeps lateral and longitudinal acceleration on slow sine waves, like a
//! car weaving through a slalom, with a short lateral spike every
//! [`SPIKE_PERIOD_S`] seconds that lands past the outer reference ring.

use std::time::Duration;

use gforce_common::Millis;

use crate::config::IMU_TOPIC;
use crate::host::{Message, MessageEvent, RenderState};
use crate::imu::{Imu, Vector3};

/// Seconds between lateral spikes.
pub const SPIKE_PERIOD_S: f32 = 7.0;

/// Spike length in seconds.
const SPIKE_WIDTH_S: f32 = 0.05;

/// Spike magnitude in g.
const SPIKE_G: f32 = 4.5;

/// Highest publish rate the binaries accept.
pub const MAX_RATE_HZ: u32 = 100_000;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DemoDrive {
    gravity: f64,
}

impl DemoDrive {
    pub const fn new(gravity: f64) -> Self { Self { gravity } }

    /// IMU reading `t` seconds into the drive.
    pub fn sample(
        &self,
        t: f32,
    ) -> Imu {
        let lateral_g = if t > 0.0 && t % SPIKE_PERIOD_S < SPIKE_WIDTH_S {
            SPIKE_G
        } else {
            fake_signal(t, -1.6, 1.6, 0.9)
        };
        let longitudinal_g = fake_signal(t + 1.0, -1.2, 0.8, 0.45);

        Imu::from_acceleration(Vector3::new(
            f64::from(longitudinal_g) * self.gravity,
            f64::from(lateral_g) * self.gravity,
            self.gravity,
        ))
    }
}

/// Publishes [`DemoDrive`] readings on the IMU topic at a fixed rate.
#[derive(Clone, Debug)]
pub struct DemoFeed {
    drive: DemoDrive,
    period: Duration,
    next: Duration,
}

impl DemoFeed {
    /// Feed publishing at `rate_hz`. The period never drops below 1 ns.
    pub fn new(
        drive: DemoDrive,
        rate_hz: u32,
    ) -> Self {
        let period_ns = (1_000_000_000 / u64::from(rate_hz.max(1))).max(1);
        Self {
            drive,
            period: Duration::from_nanos(period_ns),
            next: Duration::ZERO,
        }
    }

    /// Queue every reading due by `elapsed` into `inbox`. Returns how many were queued.
    pub fn publish_until(
        &mut self,
        elapsed: Duration,
        receive_time_ms: Millis,
        inbox: &mut RenderState,
    ) -> usize {
        let mut queued = 0;
        while self.next <= elapsed {
            let imu = self.drive.sample(self.next.as_secs_f32());
            inbox
                .current_frame
                .push(MessageEvent::new(IMU_TOPIC, receive_time_ms, Message::Imu(imu)));
            self.next += self.period;
            queued += 1;
        }
        queued
    }
}

fn fake_signal(
    t: f32,
    min: f32,
    max: f32,
    freq: f32,
) -> f32 {
    let normalized = (t * freq).sin().mul_add(0.5, 0.5);
    min + normalized * (max - min)
}
