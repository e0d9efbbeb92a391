//! End-to-end command scenarios against the engine, without sockets.

use sdg_emulator::function_generator::InstrumentModel;
use sdg_emulator::{EmulatorError, Engine};

const DEFAULT_OUTP: &str = "OFF,LOAD,HZ,PLRT,NOR";

fn engine() -> Engine {
    Engine::with_model(InstrumentModel::Sdg1032x)
}

#[test]
fn amplitude_change_recomputes_derived_values() {
    let mut engine = engine();
    assert_eq!(engine.process("*RST"), "");
    assert_eq!(engine.process("C1:BSWV AMP,17.89"), "");

    let reply = engine.process("C1:BSWV?");
    assert!(reply.starts_with("C1:BSWV WVTP,SINE,"), "{reply}");
    assert!(reply.contains("AMP,17.89V"), "{reply}");
    assert!(reply.contains("AMPVRMS,6.32411Vrms"), "{reply}");
    assert!(reply.contains("HLEV,8.945V"), "{reply}");
    assert!(reply.contains("LLEV,-8.945V"), "{reply}");
    assert!(!reply.contains("AMPDBM"), "{reply}");
}

#[test]
fn frequency_change_updates_period() {
    let mut engine = engine();
    engine.process("C2:BSWV FRQ,120.1");
    let reply = engine.process("C2:BSWV?");
    assert!(reply.contains("FRQ,120.1HZ,PERI,0.00832639S"), "{reply}");

    engine.process("C2:BSWV FRQ,3");
    let reply = engine.process("C2:BSWV?");
    assert!(reply.contains("FRQ,3HZ,PERI,0.333333S"), "{reply}");
}

#[test]
fn non_finite_values_are_ignored() {
    let mut engine = engine();
    let before = engine.process("C1:BSWV?");
    assert_eq!(engine.process("C1:BSWV AMP,nan"), "");
    assert_eq!(engine.process("C1:BSWV FRQ,inf"), "");
    assert_eq!(engine.process("C1:BSWV?"), before);
}

#[test]
fn parameter_copy_matches_source_state() {
    let mut engine = engine();
    engine.process("C1:OUTP ON,LOAD,50,PLRT,INVT");
    engine.process("C1:BSWV FRQ,33.3");

    let source_outp = engine.process("C1:OUTP?");
    let source_bswv = engine.process("C1:BSWV?");
    engine.process("PACP C2,C1");

    assert_eq!(engine.process("C2:OUTP?"), source_outp.replacen("C1:", "C2:", 1));
    assert_eq!(engine.process("C2:BSWV?"), source_bswv.replacen("C1:", "C2:", 1));
}

#[test]
fn header_modes_shape_replies() {
    let mut engine = engine();
    engine.process("CHDR OFF");
    assert_eq!(engine.process("C1:OUTP?"), DEFAULT_OUTP);
    assert_eq!(engine.process("BUZZ?"), "ON");

    engine.process("COMM_HEADER LONG");
    assert_eq!(engine.process("C2:OUTP?"), format!("C2:OUTPUT {DEFAULT_OUTP}"));
    assert_eq!(engine.process("BUZZ?"), "BUZZER ON");

    engine.process("chdr short");
    assert_eq!(engine.process("C2:OUTPUT?"), format!("C2:OUTP {DEFAULT_OUTP}"));
}

#[test]
fn unrecognised_verbs_are_ignored() {
    let mut engine = engine();
    assert_eq!(engine.process("XYZZY LOAD,HZ"), "");
    assert_eq!(engine.process("C1:XYZZY?"), "");
    assert_eq!(engine.process("C9:OUTP?"), "");
    assert_eq!(engine.process("C1:OUTP?"), format!("C1:OUTP {DEFAULT_OUTP}"));
}

#[test]
fn reset_restores_default_output_state() {
    let mut engine = engine();
    for channel in ["C1", "C2"] {
        engine.process(&format!("{channel}:OUTP ON,LOAD,50,PLRT,INVT"));
    }
    engine.process("*RST");
    for channel in ["C1", "C2"] {
        assert_eq!(
            engine.process(&format!("{channel}:OUTP?")),
            format!("{channel}:OUTP {DEFAULT_OUTP}")
        );
    }
}

#[test]
fn load_round_trip_restores_amplitude_family() {
    let mut engine = engine();
    engine.process("C1:BSWV AMP,10");
    let before = engine.process("C1:BSWV?");

    engine.process("C1:OUTP LOAD,50");
    let loaded = engine.process("C1:BSWV?");
    assert!(loaded.contains("AMP,5V,AMPVRMS,1.7675Vrms"), "{loaded}");
    assert!(loaded.contains("AMPDBM,9.99869dBm"), "{loaded}");

    engine.process("C1:OUTP LOAD,HZ");
    assert_eq!(engine.process("C1:BSWV?"), before);
}

#[test]
fn identification_and_store_list() {
    let mut engine = Engine::new("sdg1062x").unwrap();
    assert_eq!(
        engine.process("*IDN?"),
        "Siglent Technologies,SDG1062X,SDG1XCBD5R6027,1.01.01.33R1B6"
    );
    assert_eq!(engine.process("*OPC?"), "*OPC 1");
    assert_eq!(engine.process("STL? USER"), "STL WVNM");

    let builtin = engine.process("STL? BUILDIN");
    assert!(builtin.starts_with("STL M10, ExpFal, M100, ECG14"), "{builtin}");
    assert!(builtin.ends_with("M99, ECG13"), "{builtin}");
    assert_eq!(engine.process("STL?"), builtin);
}

#[test]
fn unknown_model_is_fatal() {
    assert!(matches!(
        Engine::new("SDG9999X"),
        Err(EmulatorError::UnknownModel(model)) if model == "SDG9999X"
    ));
}
