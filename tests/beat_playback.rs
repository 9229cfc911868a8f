//! Transport behavior of a loaded session, driven through the facade.

use backbeat::{
    load_beat, BeatSession, CommandLog, DecodeEvent, EngineCommand, ScriptSource,
};

fn one_synth_beat() -> Vec<DecodeEvent> {
    vec![
        DecodeEvent::enter("beat"),
        DecodeEvent::int("BPM", 120),
        DecodeEvent::exit("beat"),
        DecodeEvent::enter("tracks"),
        DecodeEvent::int("id", 0),
        DecodeEvent::str("type", "sine"),
        DecodeEvent::enter("notes"),
        DecodeEvent::BeginElement(0),
        DecodeEvent::int("step", 12),
        DecodeEvent::int("pitch", 48),
        DecodeEvent::int("len", 4),
        DecodeEvent::float("vel", 0.8),
        DecodeEvent::EndElement(0),
        DecodeEvent::exit("notes"),
        DecodeEvent::exit("tracks"),
    ]
}

#[test]
fn play_arms_the_loop_over_the_whole_beat() {
    let mut log = CommandLog::new();
    let mut session = BeatSession::new(&mut log);
    load_beat(&mut session, "one.json", &mut ScriptSource::new(one_synth_beat()));

    session.play(0);
    assert!(session.is_playing());

    let commands = session.engine().commands();
    let tail = &commands[commands.len() - 3..];
    assert_eq!(
        tail,
        [
            EngineCommand::SetLoop { start: 0, end: 16, loops: 0 },
            EngineCommand::SetCurrentStep { step: 0 },
            EngineCommand::Play,
        ]
    );
}

#[test]
fn stop_halts_the_transport() {
    let mut log = CommandLog::new();
    let mut session = BeatSession::new(&mut log);
    load_beat(&mut session, "one.json", &mut ScriptSource::new(one_synth_beat()));

    session.play(2);
    session.stop();
    assert!(!session.is_playing());
    assert_eq!(
        session
            .engine()
            .count_where(|c| matches!(c, EngineCommand::Stop)),
        1
    );
}

#[test]
fn scale_change_between_loads_rewires_chord_expansion() {
    let mut log = CommandLog::new();
    let mut session = BeatSession::new(&mut log);

    let chord_beat = vec![
        DecodeEvent::enter("scale"),
        DecodeEvent::str("type", "Natural Minor"),
        DecodeEvent::str("base", "A"),
        DecodeEvent::exit("scale"),
        DecodeEvent::enter("tracks"),
        DecodeEvent::int("id", 0),
        DecodeEvent::str("type", "square"),
        DecodeEvent::bool("chord", true),
        DecodeEvent::enter("notes"),
        DecodeEvent::BeginElement(0),
        DecodeEvent::int("step", 0),
        DecodeEvent::int("pitch", 57),
        DecodeEvent::int("len", 2),
        DecodeEvent::float("vel", 0.5),
        DecodeEvent::EndElement(0),
        DecodeEvent::exit("notes"),
        DecodeEvent::exit("tracks"),
    ];
    load_beat(&mut session, "chord.json", &mut ScriptSource::new(chord_beat));

    // A natural minor: A-57 expands to C-60 and E-64.
    let pitches: Vec<u8> = session.engine().notes_for(0).iter().map(|n| n.2).collect();
    assert_eq!(pitches, vec![57, 60, 64]);
}
