//! Capture panel board support (ESP32-C3)
//!
//! Maps the physical wiring to named subsystems so the rest of the
//! firmware never needs a GPIO number. Both chips sit on I2C0; each
//! driver gets its own `CriticalSectionDevice` over the one bus.

pub mod pins;

use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal::delay::DelayNs;
use embedded_hal_bus::i2c::CriticalSectionDevice;
use esp_hal::{
    Blocking,
    gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull},
    i2c::master::{self, I2c},
    peripherals::Peripherals,
    time::Rate,
};
use log::debug;
use static_cell::StaticCell;

use crate::drivers::ssd2533::Ssd2533;
use crate::drivers::tvp5150::Tvp5150;

// Type Aliases
pub type I2cBus = I2c<'static, Blocking>;
pub type I2cDevice = CriticalSectionDevice<'static, I2cBus>;
pub type TouchPanel = Ssd2533<I2cDevice>;
pub type Decoder = Tvp5150<I2cDevice>;

static I2C_BUS: StaticCell<Mutex<RefCell<I2cBus>>> = StaticCell::new();

// Hardware Bundles
/// Touch subsystem: bus handle and the IRQ line (pulled up, active low).
pub struct TouchHw {
    pub i2c: I2cDevice,
    pub irq: Input<'static>,
}

/// Decoder subsystem: bus handle plus the power-down and reset lines.
pub struct DecoderHw {
    pub i2c: I2cDevice,
    pub pdn: Output<'static>,
    pub reset: Output<'static>,
}

impl DecoderHw {
    /// Release power-down, then pulse RESETB. Both lines start asserted
    /// (low) from `Board::init`. The chip wants 20 ms between supplies up
    /// and reset, a 500 ns reset pulse, and 200 us before the first I2C
    /// access.
    pub fn power_up<D: DelayNs>(&mut self, delay: &mut D) {
        self.reset.set_low();
        self.pdn.set_high();
        delay.delay_ms(20);
        delay.delay_ns(500);
        self.reset.set_high();
        delay.delay_us(250);
        debug!("board: decoder out of reset");
    }
}

/// Complete board hardware, ready for driver probe.
pub struct Board {
    pub touch: TouchHw,
    pub decoder: DecoderHw,
}

impl Board {
    /// Must be called once; the shared bus lives in a `StaticCell`.
    pub fn init(p: Peripherals) -> Result<Self, master::ConfigError> {
        let cfg = master::Config::default().with_frequency(Rate::from_khz(pins::I2C_FREQ_KHZ));
        // SDA GPIO4, SCL GPIO5
        let bus = I2c::new(p.I2C0, cfg)?.with_sda(p.GPIO4).with_scl(p.GPIO5);
        let bus: &'static Mutex<RefCell<I2cBus>> = I2C_BUS.init(Mutex::new(RefCell::new(bus)));

        let irq = Input::new(p.GPIO6, InputConfig::default().with_pull(Pull::Up));

        // held in power-down until power_up()
        let pdn = Output::new(p.GPIO7, Level::Low, OutputConfig::default());
        let reset = Output::new(p.GPIO10, Level::Low, OutputConfig::default());

        Ok(Board {
            touch: TouchHw {
                i2c: CriticalSectionDevice::new(bus),
                irq,
            },
            decoder: DecoderHw {
                i2c: CriticalSectionDevice::new(bus),
                pdn,
                reset,
            },
        })
    }
}
