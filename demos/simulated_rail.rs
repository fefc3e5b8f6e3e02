//! Simulated rail example.
//!
//! Boots a rail on fake GPIO: the STEP/DIR pins move a modelled carriage, the
//! endstop pin reads the carriage position, and the camera lines print when
//! they change. The runner homes on start, then takes a short photo stack.

use std::cell::Cell;
use std::rc::Rc;

use macro_rail::{
    CameraTrigger, Command, Endstop, EndstopInput, Instant, MotionDriver, PinTrigger, RailConfig,
    RailControl, RailRunner, ShootRequest, StepperMotorBuilder,
};

/// Carriage position in microsteps, shared by the fake pins.
#[derive(Clone, Default)]
struct Carriage {
    position: Rc<Cell<i64>>,
    reverse: Rc<Cell<bool>>,
}

/// STEP pin: each rising edge moves the carriage one microstep.
struct StepPin(Carriage, bool);

/// DIR pin: high drives toward the endstop (the default config inverts DIR).
struct DirPin(Carriage);

/// ENABLE pin.
struct EnablePin;

/// Endstop input: pulled low while the carriage is at or past the switch.
struct SwitchPin(Carriage);

/// Camera line that prints its transitions.
struct CameraLine(&'static str);

/// Delay provider; the pulse width does not matter here.
struct NoDelay;

impl embedded_hal::digital::ErrorType for StepPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for StepPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        if !self.1 {
            let delta = if self.0.reverse.get() { -1 } else { 1 };
            self.0.position.set(self.0.position.get() + delta);
        }
        self.1 = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.1 = false;
        Ok(())
    }
}

impl embedded_hal::digital::ErrorType for DirPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for DirPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.reverse.set(true);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.reverse.set(false);
        Ok(())
    }
}

impl embedded_hal::digital::ErrorType for EnablePin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for EnablePin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl embedded_hal::digital::ErrorType for SwitchPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::InputPin for SwitchPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.position.get() > 0)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.position.get() <= 0)
    }
}

impl embedded_hal::digital::ErrorType for CameraLine {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for CameraLine {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        println!("  {} on", self.0);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl embedded_hal::delay::DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Run the loop until no command is pending and the rail is at rest.
fn run_until_rest<M, C, E>(runner: &mut RailRunner<M, C, E>, now_us: &mut u64) -> macro_rail::Result<()>
where
    M: MotionDriver,
    C: CameraTrigger,
    E: EndstopInput,
{
    loop {
        runner.run_once(Instant::from_micros(*now_us))?;
        // 20 µs of simulated time per iteration
        *now_us += 20;
        let state = runner.control().rail().state();
        if runner.pending() == 0 && !state.is_busy() {
            return Ok(());
        }
    }
}

fn main() -> macro_rail::Result<()> {
    println!("=== Simulated Macro Rail ===\n");

    let config = RailConfig::default();
    let carriage = Carriage::default();

    // Carriage starts 3 mm away from the switch
    let steps_per_mm = config.mechanics().steps_per_mm;
    carriage.position.set((3.0 * steps_per_mm) as i64);

    let motor = StepperMotorBuilder::new()
        .from_config(&config)
        .name("rail")
        .step_pin(StepPin(carriage.clone(), false))
        .dir_pin(DirPin(carriage.clone()))
        .enable_pin(EnablePin)
        .delay(NoDelay)
        .build()?;
    let trigger = PinTrigger::new(CameraLine("focus"), CameraLine("shutter"))?;
    let endstop = Endstop::new(SwitchPin(carriage.clone()), config.endstop.active_low);

    let control = RailControl::new(motor, trigger, endstop, &config);
    let mut runner: RailRunner<_, _, _> = RailRunner::new(control, &config.control);
    runner.start();

    let mut now_us = 0u64;

    println!("Homing...");
    run_until_rest(&mut runner, &mut now_us)?;
    let status = runner.control().status();
    println!(
        "State: {}, homed: {}, position {:.3} mm ({} steps)",
        status.state, status.homed, status.position, status.steps
    );
    if let Some(report) = status.homing {
        println!(
            "Endstop hit after {} steps in {} ms (avg {:.2} mm/s)",
            report.steps_moved, report.elapsed_ms, report.average_mm_per_sec
        );
    }

    println!("\nShooting 3 photos, 0.1 mm apart...");
    let request = ShootRequest {
        photos: Some(3),
        step: Some(0.1),
        return_to_start: true,
        ..ShootRequest::default()
    };
    runner.submit(Command::Shoot(request))?;
    run_until_rest(&mut runner, &mut now_us)?;

    let status = runner.control().status();
    println!(
        "\nDone: state {}, position {:.3} mm, fault {:?}",
        status.state, status.position, status.fault
    );
    Ok(())
}
