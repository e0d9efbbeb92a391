//! Power-on settings of the emulated instrument.
//!
//! The snapshots are immutable; resets copy them into fresh owned maps so no two
//! channels ever share storage.

/// Channel settings in the order they are kept.
pub const CHANNEL_DEFAULTS: &[(&str, &str)] = &[
    ("OUTPUT", "OFF"),
    ("WVTP", "SINE"),
    ("FRQ", "1000"),
    ("PERI", "0.001"),
    ("AMP", "4"),
    ("AMPVRMS", "1.414"),
    ("AMPDBM", "19.99738"),
    ("OFST", "0"),
    ("HLEV", "2"),
    ("LLEV", "-2"),
    ("PHSE", "0"),
    ("LOAD", "HZ"),
    ("PLRT", "NOR"),
    ("MAX_OUTPUT_AMP", "20"),
];

/// Built-in stored waveform list, as returned by `STL?`.
pub const BUILTIN_WAVEFORMS: &str = "STL M10, ExpFal, M100, ECG14, M101, ECG15, M102, LFPulse, M103, Tens1, M104, \
    Tens2, M105, Tens3, M106, Airy, M107, Besselj, M108, Bessely, M109, \
    Dirichlet, M11, ExpRise, M110, Erf, M111, Erfc, M112, ErfcInv, M113, ErfInv, \
    M114, Laguerre, M115, Legend, M116, Versiera, M117, Weibull, M118, LogNormal, \
    M119, Laplace, M12, LogFall, M120, Maxwell, M121, Rayleigh, M122, Cauchy, \
    M123, CosH, M124, CosInt, M125, CotH, M126, CscH, M127, SecH, M128, SinH, \
    M129, SinInt, M13, LogRise, M130, TanH, M131, ACosH, M132, ASecH, M133, \
    ASinH, M134, ATanH, M135, ACsch, M136, ACoth, M137, Bartlett, M138, \
    BohmanWin, M139, ChebWin, M14, Sqrt, M140, FlattopWin, M141, ParzenWin, M142, \
    TaylorWin, M143, TukeyWin, M144, Duty01, M145, Duty02, M146, Duty04, M147, \
    Duty06, M148, Duty08, M149, Duty10, M15, Root3, M150, Duty12, M151, Duty14, \
    M152, Duty16, M153, Duty18, M154, Duty20, M155, Duty22, M156, Duty24, M157, \
    Duty26, M158, Duty28, M159, Duty30, M16, X^2, M160, Duty32, M161, Duty34, \
    M162, Duty36, M163, Duty38, M164, Duty40, M165, Duty42, M166, Duty44, M167, \
    Duty46, M168, Duty48, M169, Duty50, M17, X^3, M170, Duty52, M171, Duty54, \
    M172, Duty56, M173, Duty58, M174, Duty60, M175, Duty62, M176, Duty64, M177, \
    Duty66, M178, Duty68, M179, Duty70, M18, Sinc, M180, Duty72, M181, Duty74, \
    M182, Duty76, M183, Duty78, M184, Duty80, M185, Duty82, M186, Duty84, M187, \
    Duty86, M188, Duty88, M189, Duty90, M19, Gaussian, M190, Duty92, M191, \
    Duty94, M192, Duty96, M193, Duty98, M194, Duty99, M195, demo1_375, M196, \
    demo1_16k, M197, demo2_3k, M198, demo2_16k, M2, StairUp, M20, Dlorentz, M21, \
    Haversine, M22, Lorentz, M23, Gauspuls, M24, Gmonopuls, M25, Tripuls, M26, \
    Cardiac, M27, Quake, M28, Chirp, M29, Twotone, M3, StairDn, M30, SNR, M31, \
    Hamming, M32, Hanning, M33, kaiser, M34, Blackman, M35, Gausswin, M36, \
    Triangle, M37, BlackmanH, M38, Bartlett-Hann, M39, Tan, M4, StairUD, M40, \
    Cot, M41, Sec, M42, Csc, M43, Asin, M44, Acos, M45, Atan, M46, Acot, M47, \
    Square, M48, SineTra, M49, SineVer, M5, Ppulse, M50, AmpALT, M51, AttALT, \
    M52, RoundHalf, M53, RoundsPM, M54, BlaseiWave, M55, DampedOsc, M56, \
    SwingOsc, M57, Discharge, M58, Pahcur, M59, Combin, M6, Npulse, M60, SCR, \
    M61, Butterworth, M62, Chebyshev1, M63, Chebyshev2, M64, TV, M65, Voice, M66, \
    Surge, M67, Radar, M68, Ripple, M69, Gamma, M7, Trapezia, M70, StepResp, M71, \
    BandLimited, M72, CPulse, M73, CWPulse, M74, GateVibr, M75, LFMPulse, M76, \
    MCNoise, M77, AM, M78, FM, M79, PFM, M8, Upramp, M80, PM, M81, PWM, M82, EOG, \
    M83, EEG, M84, EMG, M85, Pulseilogram, M86, ResSpeed, M87, ECG1, M88, ECG2, \
    M89, ECG3, M9, Dnramp, M90, ECG4, M91, ECG5, M92, ECG6, M93, ECG7, M94, ECG8, \
    M95, ECG9, M96, ECG10, M97, ECG11, M98, ECG12, M99, ECG13";

/// User stored waveform list, as returned by `STL? USER`.
pub const USER_WAVEFORMS: &str = "STL WVNM";

/// Device-wide settings in the order they are kept.
pub const DEVICE_DEFAULTS: &[(&str, &str)] = &[
    ("CHDR", "SHORT"),
    ("BUZZ", "ON"),
    ("STL", BUILTIN_WAVEFORMS),
    ("STL USER", USER_WAVEFORMS),
];
