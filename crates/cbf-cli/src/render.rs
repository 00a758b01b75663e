// ─────────────────────────────────────────────────────────────────────
// CBF Flight Kernel — Console Rendering
// ─────────────────────────────────────────────────────────────────────

use cbf_core::TickOutcome;
use cbf_types::TelemetrySnapshot;

/// Three console lines for one tick: decision, physical, cyber.
pub fn tick_lines(outcome: &TickOutcome, snap: &TelemetrySnapshot) -> String {
    let replay = if snap.replay_attack { "DETECTED!" } else { "none" };
    let auth = if snap.command_authenticated {
        "verified"
    } else {
        "UNAUTHORIZED!"
    };
    format!(
        "\n[Tick {}] >>> MODE: {} | TRUST SCORE: {}\n   \
         PHYSICAL: Roll: {:.1}° | Pitch: {:.1}° | Vibration: {:.1}%\n   \
         CYBER   : Replay: {} | Auth: {} | Latency: {}ms",
        outcome.tick,
        outcome.mode,
        outcome.assessment.score,
        snap.roll_deg,
        snap.pitch_deg,
        snap.vibration,
        replay,
        auth,
        snap.latency_ms,
    )
}
