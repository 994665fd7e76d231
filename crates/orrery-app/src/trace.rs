//! Periodic per-body debug output.

use tracing::debug;

use orrery_space::SolarSystem;

/// Whether frame `frame` should log body positions. `every == 0` disables.
pub fn trace_due(frame: u64, every: u64) -> bool {
    every > 0 && frame > 0 && frame % every == 0
}

/// Log one line per planet when [`trace_due`] says so.
pub fn log_bodies(system: &SolarSystem, frame: u64, every: u64) {
    if !trace_due(frame, every) {
        return;
    }
    for planet in system.planets() {
        let position = planet.position();
        debug!(
            frame,
            body = %planet.name,
            angle = planet.angle(),
            x = position.x,
            z = position.z,
            "body position"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_cadence() {
        assert!(!trace_due(0, 10));
        assert!(!trace_due(5, 10));
        assert!(trace_due(10, 10));
        assert!(trace_due(20, 10));
        assert!(!trace_due(10, 0));
    }
}
