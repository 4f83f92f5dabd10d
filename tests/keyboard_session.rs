use saavy_keys::{
    engine::{AudioBackend, ContextState, OfflineBackend},
    input::{Action, InputEvent},
    Keyboard, KeyboardConfig,
};

const SAMPLE_RATE: f32 = 8_000.0;

fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
}

#[test]
fn press_and_release_lowest_key() {
    let mut keyboard = Keyboard::new(OfflineBackend::new(SAMPLE_RATE), &KeyboardConfig::default());

    let action = keyboard.handle(InputEvent::KeyDown("90".into()));
    assert_eq!(
        action,
        Some(Action::Start {
            input_code: "90",
            frequency: 261.63
        })
    );
    assert_eq!(keyboard.backend().state(), ContextState::Running);
    assert_eq!(keyboard.voices().len(), 1);
    assert!(keyboard.visuals().is_key_active("90"));

    let hue = keyboard.visuals().background().map(|c| c.hue).unwrap();
    assert!((hue - 0.793).abs() < 1e-3, "hue {hue}");

    // Hold through attack and decay into sustain
    let held = keyboard.backend_mut().render_seconds(0.5);
    let sustain_peak = peak(&held[held.len() - 400..]);
    assert!(
        (sustain_peak - 0.7 * 0.2).abs() < 0.01,
        "sustain peak {sustain_peak}"
    );

    let action = keyboard.handle(InputEvent::KeyUp("90".into()));
    assert_eq!(action, Some(Action::Stop { input_code: "90" }));
    assert!(keyboard.voices().is_empty());
    assert!(!keyboard.visuals().is_key_active("90"));

    // The release tail is still audible right after the key-up...
    let tail = keyboard.backend_mut().render_seconds(0.2);
    assert!(peak(&tail[..80]) > 0.1);

    // ...and fully silent once the release window has passed
    let after = keyboard.backend_mut().render_seconds(0.1);
    assert!(after.iter().all(|&s| s == 0.0));
    assert_eq!(keyboard.backend().voice_count(), 0);
}

#[test]
fn release_tail_is_continuous() {
    let mut keyboard = Keyboard::new(OfflineBackend::new(SAMPLE_RATE), &KeyboardConfig::default());

    keyboard.handle(InputEvent::PointerDown("78".into()));
    // Release in the middle of the decay
    let before = keyboard.backend_mut().render_seconds(0.12);
    keyboard.handle(InputEvent::PointerLeave("78".into()));
    let after = keyboard.backend_mut().render_seconds(0.02);

    // An A4 period is ~18 samples at 8 kHz; compare one period either side
    let before_peak = peak(&before[before.len() - 20..]);
    let after_peak = peak(&after[..20]);
    assert!(
        (before_peak - after_peak).abs() < 0.02,
        "jump from {before_peak} to {after_peak}"
    );
}

#[test]
fn chords_sum_and_unknown_keys_stay_silent() {
    let mut keyboard = Keyboard::new(OfflineBackend::new(SAMPLE_RATE), &KeyboardConfig::default());

    assert!(keyboard.handle(InputEvent::KeyDown("65".into())).is_none());
    assert!(keyboard.backend_mut().render_seconds(0.05).iter().all(|&s| s == 0.0));

    for code in ["90", "67", "66"] {
        keyboard.handle(InputEvent::KeyDown(code.into()));
    }
    assert_eq!(keyboard.voices().len(), 3);

    let chord = keyboard.backend_mut().render_seconds(0.3);
    assert!(peak(&chord) > 0.2, "three voices should exceed one");
}
