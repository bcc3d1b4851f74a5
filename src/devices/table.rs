//! Static device tables.
//!
//! Plain immutable data: raw XML tag -> display name, group kind -> branch
//! preset tag, and the two edition tiers. Nothing here is mutated at runtime;
//! per-instance overrides are merged by [`super::DeviceClassifier`].

/// Raw device tag to standard display name.
///
/// Several tags alias the same device across Live versions (`Eq3`,
/// `FilterEQ3` and `EQThree` are all EQ Three). Every alias is kept.
pub const DEFAULT_DEVICE_MAP: &[(&str, &str)] = &[
    // Audio effects
    ("AlignDelay", "Align Delay"),
    ("Amp", "Amp"),
    ("AudioEffectGroupDevice", "Audio Effect Rack"),
    ("AutoFilter", "Auto Filter"),
    ("AutoPan", "Auto Pan"),
    ("AutoShift", "Auto Shift"),
    ("BeatRepeat", "Beat Repeat"),
    ("Cabinet", "Cabinet"),
    ("ChannelEq", "Channel EQ"),
    ("Chorus", "Chorus-Ensemble"),
    ("ChromaticChorus", "Chorus-Ensemble"),
    ("ChorusEnsemble", "Chorus-Ensemble"),
    ("Compressor2", "Compressor"),
    ("Compressor", "Compressor"),
    ("Corpus", "Corpus"),
    ("Delay", "Delay"),
    ("DrumBuss", "Drum Buss"),
    ("DynamicTube", "Dynamic Tube"),
    ("Tube", "Dynamic Tube"),
    ("Echo", "Echo"),
    ("EnvelopeFollower", "Envelope Follower"),
    ("FilterEQ3", "EQ Three"),
    ("Eq3", "EQ Three"),
    ("EQThree", "EQ Three"),
    ("Eq8", "EQ Eight"),
    ("EQEight", "EQ Eight"),
    ("Erosion", "Erosion"),
    ("ExternalAudioEffect", "External Audio Effect"),
    ("FilterDelay", "Filter Delay"),
    ("Gate", "Gate"),
    ("GlueCompressor", "Glue Compressor"),
    ("GrainDelay", "Grain Delay"),
    ("HybridReverb", "Hybrid Reverb"),
    ("LFO", "LFO"),
    ("Limiter", "Limiter"),
    ("Looper", "Looper"),
    ("MultibandDynamics", "Multiband Dynamics"),
    ("MultibandCompressor", "Multiband Dynamics"),
    ("Overdrive", "Overdrive"),
    ("Pedal", "Pedal"),
    ("Phaser", "Phaser"),
    ("PhaserFlanger", "Phaser-Flanger"),
    ("Flanger", "Flanger"),
    ("PhaserNew", "Phaser-Flanger"),
    ("Redux", "Redux"),
    ("Resonators", "Resonators"),
    ("Reverb", "Reverb"),
    ("Roar", "Roar"),
    ("Saturator", "Saturator"),
    ("Shaper", "Shaper"),
    ("Shifter", "Shifter"),
    ("FrequencyShifter", "Frequency Shifter"),
    ("Frequency", "Frequency Shifter"),
    ("SpectralResonator", "Spectral Resonator"),
    ("SpectralTime", "Spectral Time"),
    ("Spectrum", "Spectrum"),
    ("Tuner", "Tuner"),
    ("Utility", "Utility"),
    ("VinylDistortion", "Vinyl Distortion"),
    ("Vocoder", "Vocoder"),
    ("AutoFilter2", "Auto Filter"),
    ("BitCrusher", "Redux"),
    ("Bitcrusher", "Redux"),
    ("Chorus2", "Chorus"),
    ("ColorLimiter", "Color Limiter"),
    ("ConvolutionReverb", "Convolution Reverb"),
    ("ConvolutionReverbPro", "Convolution Reverb Pro"),
    ("Distortion", "Overdrive"),
    ("EQFilter", "Filter EQ"),
    ("FilterEQ", "Filter EQ"),
    ("GatedDelay", "Gated Delay"),
    ("InMeasurementDevice", "IR Measurement Device"),
    ("Limiter2", "Limiter"),
    ("Phaser2", "Phaser"),
    ("PingPongDelay", "Ping Pong Delay"),
    ("PitchHack", "Pitch Hack"),
    ("ReEnveloper", "Re-Enveloper"),
    ("SimpleDelay", "Simple Delay"),
    ("SpectralBlur", "Spectral Blur"),
    ("Stereo", "Utility"),
    ("StereoImager", "Utility"),
    ("SurroundPanner", "Surround Panner"),
    ("VectorDelay", "Vector Delay"),
    ("VectorFade", "Vector Fade"),
    ("VectorGrain", "Vector Grain"),
    // CV Tools
    ("CVClockIn", "CV Clock In"),
    ("CVClockOut", "CV Clock Out"),
    ("CVEnvelopeFollower", "CV Envelope Follower"),
    ("CVInstrument", "CV Instrument"),
    ("CVLFO", "CV LFO"),
    ("CVShaper", "CV Shaper"),
    ("CVUtility", "CV Utility"),
    // Instruments
    ("AnalogDevice", "Analog"),
    ("Analog", "Analog"),
    ("Collision", "Collision"),
    ("DrumRack", "Drum Rack"),
    ("InstrumentRack", "Instrument Rack"),
    ("Electric", "Electric"),
    ("ExternalInstrument", "External Instrument"),
    ("GranulatorIII", "Granulator III"),
    ("Granulator", "Granulator III"),
    ("InstrumentImpulse", "Impulse"),
    ("Impulse", "Impulse"),
    ("Meld", "Meld"),
    ("Operator", "Operator"),
    ("Poli", "Poli"),
    ("Sampler", "Sampler"),
    ("Simpler", "Simpler"),
    ("Tension", "Tension"),
    ("Wavetable", "Wavetable"),
    ("Bass", "Bass"),
    ("Drift", "Drift"),
    ("DrumSampler", "Drum Sampler"),
    ("InstrumentGroupDevice", "Instrument Rack"),
    ("MidiEffectGroupDevice", "MIDI Effect Rack"),
    ("DrumGroupDevice", "Drum Rack"),
    ("Bass2", "Bass"),
    ("Collision2", "Collision"),
    ("DrumMachine", "Drum Machine"),
    ("ElectricPiano", "Electric Piano"),
    ("GrandPiano", "Grand Piano"),
    ("Operator2", "Operator"),
    ("OriginalSimpler", "Original Simpler"),
    ("PercussionRack", "Percussion Rack"),
    ("Sampler2", "Sampler"),
    ("Simpler2", "Simpler"),
    ("StringStudio", "String Studio"),
    ("Treee", "Tree Tone"),
    ("UltraAnalog", "Ultra Analog"),
    ("VectorFM", "Vector FM"),
    // Drum synths
    ("DSAnalog", "DS Analog"),
    ("DSClang", "DS Clang"),
    ("DSClap", "DS Clap"),
    ("DSCymbal", "DS Cymbal"),
    ("DSDrum", "DS Drum"),
    ("DSFM", "DS FM"),
    ("DSHH", "DS HH"),
    ("DSKick", "DS Kick"),
    ("DSPenta", "DS Penta"),
    ("DSSnare", "DS Snare"),
    ("DSTom", "DS Tom"),
    ("FMDrum", "FM Drum"),
    // MIDI effects
    ("Arpeggiator", "Arpeggiator"),
    ("Arpeggiate", "Arpeggiator"),
    ("CCControl", "CC Control"),
    ("Chord", "Chord"),
    ("NoteEcho", "Note Echo"),
    ("NoteLength", "Note Length"),
    ("Pitch", "Pitch"),
    ("Random", "Random"),
    ("Scale", "Scale"),
    ("Velocity", "Velocity"),
    ("ArrangementLooper", "Arrangement Looper"),
    ("BouncyNotes", "Bouncy Notes"),
    ("EnvelopeMidi", "Envelope MIDI"),
    ("ExpressionControl", "Expression Control"),
    ("Microtuner", "Microtuner"),
    ("MidiArp", "MIDI Arp"),
    ("MidiChord", "MIDI Chord"),
    ("MidiEcho", "MIDI Echo"),
    ("MidiEffectRack", "MIDI Effect Rack"),
    ("MidiMonitor", "MIDI Monitor"),
    ("MidiNoteLength", "MIDI Note Length"),
    ("MidiPitcher", "MIDI Pitcher"),
    ("MidiRandom", "MIDI Random"),
    ("MidiScale", "MIDI Scale"),
    ("MidiVelocity", "MIDI Velocity"),
    ("MidiVelocityShaper", "MIDI Velocity Shaper"),
    ("MPEControl", "MPE Control"),
    ("Performer", "Performer"),
    ("Prearranger", "Prearranger"),
    ("Quantize", "Quantize"),
    ("ShaperMidi", "Shaper MIDI"),
    ("StepArp", "Step Arp"),
    ("StepSequencer", "SQ Sequencer"),
    ("TimeSpan", "Time Span"),
    ("TimeWarp", "Time Warp"),
    // Live 12 MIDI generators and transformations
    ("Connect", "Connect"),
    ("ExpressiveChords", "Expressive Chords"),
    ("Finger", "Finger"),
    ("MelodicSteps", "Melodic Steps"),
    ("MidiEuclideanGenerator", "MIDI Euclidean Generator"),
    ("Ornament", "Ornament"),
    ("Pattern", "Pattern"),
    ("Recombine", "Recombine"),
    ("Rhythm", "Rhythm"),
    ("RhythmicSteps", "Rhythmic Steps"),
    ("Seed", "Seed"),
    ("Shape", "Shape"),
    ("Stacks", "Stacks"),
    ("Strum", "Strum"),
];

/// Group device tag to the tag of its serialized branches.
pub const BRANCH_TYPE_MAP: &[(&str, &str)] = &[
    ("AudioEffectGroupDevice", "AudioEffectBranchPreset"),
    ("InstrumentGroupDevice", "InstrumentBranchPreset"),
    ("MidiEffectGroupDevice", "MidiEffectBranchPreset"),
];

/// Lowercased device keys only available in Live Suite.
pub const SUITE_ONLY_DEVICES: &[&str] = &[
    "operator",
    "analog",
    "analogdevice",
    "collision",
    "tension",
    "electric",
    "sampler",
    "wavetable",
    "poli",
    "bass",
    "drift",
    "meld",
    "amp",
    "cabinet",
    "corpus",
    "drumbus",
    "drumbuss",
    "echo",
    "filterdelay",
    "gluecompressor",
    "hybridreverb",
    "multibandcompressor",
    "multibanddynamics",
    "overdrive",
    "pedal",
    "resonators",
    "saturator",
    "vocoder",
];

/// Lowercased device keys that need at least Live Standard.
pub const STANDARD_DEVICES: &[&str] = &[
    "eq8",
    "eqeight",
    "compressor2",
    "compressor",
    "autofilter",
    "reverb",
    "delay",
    "chorus",
    "phaser",
    "flanger",
    "autopan",
    "gate",
    "limiter",
    "beatrepeat",
    "looper",
    "grain",
    "simpler",
    "impulse",
    "drumrack",
];
