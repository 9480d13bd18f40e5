//! Sensor sampling, conversion and simulation.
//!
//! The `Sampler` owns the analog reader, the inter-sample delay source and
//! the RNG that drives simulation mode. Real readings are multi-sample
//! averages converted through the ADC/LM35 constants; synthetic readings are
//! a bounded random walk around a lazily latched baseline.

use core::fmt::Write;
use core::marker::PhantomData;

use embedded_hal::delay::DelayNs;
use micromath::F32Ext;
use rand_core::RngCore;

use crate::adc::{AdcRead, Channel};
use crate::config::MonitorConfig;
use crate::io::SerialIo;
use crate::state::SystemState;

// Raw-count thresholds for the wiring hints in the diagnostic readout.
const RAW_SUSPECT_LOW: u16 = 10;
const RAW_SUSPECT_HIGH: u16 = 1000;

// Bounded random walk: per-step offset and allowed drift from baseline.
const WALK_STEP: f32 = 0.5;
const WALK_BOUND: f32 = 2.0;

// Synthetic reset values.
const SYNTH_ROOM_DEFAULT: f32 = 24.0;
const SYNTH_ALGAE_DEFAULT: f32 = 22.0;

/// True when `t` lies in the plausible display range `[TEMP_VALID_MIN, TEMP_VALID_MAX)`.
///
/// Values outside render as `ERROR` and, in verbose mode, log a warning.
pub fn in_valid_range<C: MonitorConfig>(t: f32) -> bool {
    (C::TEMP_VALID_MIN..C::TEMP_VALID_MAX).contains(&t)
}

/// Temperature sampler for both channels, real and simulated.
///
/// Generic over:
/// - `A`: AdcRead implementation (raw analog counts)
/// - `D`: DelayNs implementation (inter-sample spacing)
/// - `R`: RngCore implementation (simulation walk)
/// - `C`: MonitorConfig implementation
pub struct Sampler<A, D, R, C>
where
    A: AdcRead,
    D: DelayNs,
    R: RngCore,
    C: MonitorConfig,
{
    adc: A,
    delay: D,
    rng: R,

    /// Current synthetic values, one per channel
    synth_room: f32,
    synth_algae: f32,

    /// Walk baselines, latched on the first perturbation (or by a setter)
    base_room: Option<f32>,
    base_algae: Option<f32>,

    _config: PhantomData<C>,
}

impl<A, D, R, C> core::fmt::Debug for Sampler<A, D, R, C>
where
    A: AdcRead,
    D: DelayNs,
    R: RngCore,
    C: MonitorConfig,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Sampler")
            .field("synth_room", &self.synth_room)
            .field("synth_algae", &self.synth_algae)
            .field("base_room", &self.base_room)
            .field("base_algae", &self.base_algae)
            .finish_non_exhaustive()
    }
}

impl<A, D, R, C> Sampler<A, D, R, C>
where
    A: AdcRead,
    D: DelayNs,
    R: RngCore,
    C: MonitorConfig,
{
    /// Create a sampler with synthetic values at their reset defaults.
    pub fn new(adc: A, delay: D, rng: R) -> Self {
        Self {
            adc,
            delay,
            rng,
            synth_room: SYNTH_ROOM_DEFAULT,
            synth_algae: SYNTH_ALGAE_DEFAULT,
            base_room: None,
            base_algae: None,
            _config: PhantomData,
        }
    }

    /// Convert an averaged raw count to `(volts, degrees)`.
    pub fn convert(avg_counts: f32) -> (f32, f32) {
        let volts = (avg_counts / C::ADC_RESOLUTION) * C::REFERENCE_VOLTAGE;
        let degrees = volts * C::DEGREES_PER_VOLT;
        (volts, degrees)
    }

    /// Average `count` consecutive raw samples, `SAMPLE_DELAY_MS` apart.
    ///
    /// Blocks for `count x SAMPLE_DELAY_MS`; command intake stalls for the
    /// duration (single-threaded loop, no suspension points).
    fn averaged_raw(&mut self, channel: Channel, count: usize) -> f32 {
        let mut sum: u32 = 0;
        for _ in 0..count {
            sum += u32::from(self.adc.read(channel));
            self.delay.delay_ms(C::SAMPLE_DELAY_MS);
        }
        sum as f32 / count as f32
    }

    /// Sample one channel: averaged read, converted to degrees.
    ///
    /// When `verbose` is set, prints the raw average, intermediate voltage
    /// and final temperature.
    pub fn sample<IO: SerialIo>(
        &mut self,
        channel: Channel,
        verbose: bool,
        io: &mut IO,
    ) -> Result<f32, IO::Error> {
        let avg = self.averaged_raw(channel, C::SAMPLES_PER_READ);
        let (volts, degrees) = Self::convert(avg);

        if verbose {
            let mut line: heapless::String<96> = heapless::String::new();
            let _ = write!(
                line,
                "  [ch {}] ADC: {:.1} | Voltage: {:.3}V | Temp: {:.2}\u{b0}C",
                channel.index(),
                avg,
                volts,
                degrees
            );
            io.write_line(&line)?;
        }

        Ok(degrees)
    }

    /// Refresh `state` with current readings.
    ///
    /// Simulation mode copies the synthetic values; real mode samples both
    /// channels. An implausible reading is still stored (the renderer shows
    /// it as `ERROR`); the warning is only printed in verbose mode.
    pub fn update<IO: SerialIo>(
        &mut self,
        state: &mut SystemState,
        io: &mut IO,
    ) -> Result<(), IO::Error> {
        if state.simulate {
            state.room_temp = self.synth_room;
            state.algae_temp = self.synth_algae;
        } else {
            state.room_temp = self.sample(Channel::Room, state.verbose, io)?;
            state.algae_temp = self.sample(Channel::Algae, state.verbose, io)?;

            if state.verbose {
                if !in_valid_range::<C>(state.room_temp) {
                    io.write_line("WARNING: Room sensor reading out of range!")?;
                }
                if !in_valid_range::<C>(state.algae_temp) {
                    io.write_line("WARNING: Algae sensor reading out of range!")?;
                }
            }
        }

        if state.verbose {
            let mut line: heapless::String<96> = heapless::String::new();
            let _ = write!(
                line,
                "Room: {:.1}\u{b0}C | Algae: {:.1}\u{b0}C | Mode: {}",
                state.room_temp,
                state.algae_temp,
                if state.simulate { "FAKE" } else { "REAL" }
            );
            io.write_line(&line)?;
        }

        Ok(())
    }

    /// Perturb both synthetic values by one walk step.
    ///
    /// Each value gets a uniform offset in `[-0.5, +0.5]`. Baselines latch on
    /// the first call; a value that has strayed more than 2.0 from its
    /// baseline is re-seated at baseline + uniform `[-2.0, +2.0]`.
    pub fn fluctuate(&mut self) {
        let step = self.uniform(-WALK_STEP, WALK_STEP);
        self.synth_room += step;
        let step = self.uniform(-WALK_STEP, WALK_STEP);
        self.synth_algae += step;

        let base = *self.base_room.get_or_insert(self.synth_room);
        if (self.synth_room - base).abs() > WALK_BOUND {
            self.synth_room = base + self.uniform(-WALK_BOUND, WALK_BOUND);
        }

        let base = *self.base_algae.get_or_insert(self.synth_algae);
        if (self.synth_algae - base).abs() > WALK_BOUND {
            self.synth_algae = base + self.uniform(-WALK_BOUND, WALK_BOUND);
        }
    }

    /// Set a synthetic value and re-latch its walk baseline.
    ///
    /// Re-latching makes the walk hold the new set point instead of drifting
    /// back toward wherever the walk started.
    pub fn set_synthetic(&mut self, channel: Channel, degrees: f32) {
        match channel {
            Channel::Room => {
                self.synth_room = degrees;
                self.base_room = Some(degrees);
            }
            Channel::Algae => {
                self.synth_algae = degrees;
                self.base_algae = Some(degrees);
            }
        }
    }

    /// Current synthetic value for `channel`.
    pub fn synthetic(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Room => self.synth_room,
            Channel::Algae => self.synth_algae,
        }
    }

    /// Walk baseline for `channel`, if latched.
    pub fn baseline(&self, channel: Channel) -> Option<f32> {
        match channel {
            Channel::Room => self.base_room,
            Channel::Algae => self.base_algae,
        }
    }

    /// Single-shot readout of both channels with wiring hints.
    ///
    /// Uses one raw conversion per channel (no averaging) so the printed
    /// counts are directly comparable against a multimeter.
    pub fn diagnostic<IO: SerialIo>(&mut self, io: &mut IO) -> Result<(), IO::Error> {
        io.write_line("--- LM35 Sensor Test ---")?;

        for channel in [Channel::Room, Channel::Algae] {
            let raw = self.adc.read(channel);
            let (volts, degrees) = Self::convert(raw as f32);

            let mut line: heapless::String<96> = heapless::String::new();
            let _ = write!(
                line,
                "{} sensor (ch {}): ADC={}, V={:.3}V, T={:.1}\u{b0}C",
                channel.label(),
                channel.index(),
                raw,
                volts,
                degrees
            );
            io.write_line(&line)?;

            if raw < RAW_SUSPECT_LOW {
                io.write_line("  \u{26a0} Very low reading - Check if sensor is connected!")?;
            } else if raw > RAW_SUSPECT_HIGH {
                io.write_line("  \u{26a0} Very high reading - Check wiring!")?;
            } else {
                io.write_line("  \u{2713} Sensor appears to be working")?;
            }
        }

        io.write_line("--- Test Complete ---")?;
        io.write_line("")
    }

    /// Long-average readout of both channels plus LM35 troubleshooting text.
    pub fn calibrate<IO: SerialIo>(&mut self, io: &mut IO) -> Result<(), IO::Error> {
        io.write_line("")?;
        io.write_line("=== LM35 CALIBRATION INFO ===")?;
        io.write_line("LM35 outputs 10mV per \u{b0}C")?;
        io.write_line("At 25\u{b0}C: ~250mV (0.25V)")?;
        io.write_line("At 30\u{b0}C: ~300mV (0.30V)")?;
        io.write_line("")?;
        io.write_line("Current readings (averaged over 50 samples):")?;

        for channel in [Channel::Room, Channel::Algae] {
            let avg = self.averaged_raw(channel, C::CALIBRATION_SAMPLES);
            let (volts, degrees) = Self::convert(avg);

            let mut line: heapless::String<96> = heapless::String::new();
            let _ = write!(
                line,
                "{} (ch {}): ADC={:.1}, Voltage={:.3}V, Temp={:.2}\u{b0}C",
                channel.label(),
                channel.index(),
                avg,
                volts,
                degrees
            );
            io.write_line(&line)?;
        }

        io.write_line("")?;
        io.write_line("Troubleshooting:")?;
        io.write_line("- If temp shows ~49\u{b0}C indoors \u{2192} Sensor backwards!")?;
        io.write_line("- If temp shows 0\u{b0}C \u{2192} Check OUTPUT pin connection")?;
        io.write_line("- If temp shows 100+\u{b0}C \u{2192} Check VCC/GND wiring")?;
        io.write_line("- LM35 pinout (flat side facing you): VCC | OUT | GND")?;
        io.write_line("================================")?;
        io.write_line("")
    }

    /// Uniform sample in `[lo, hi)`.
    fn uniform(&mut self, lo: f32, hi: f32) -> f32 {
        // 24 bits keep the intermediate exactly representable, so the result
        // stays strictly below `hi`.
        let unit = (self.rng.next_u32() >> 8) as f32 / 16_777_216.0;
        lo + (hi - lo) * unit
    }
}
