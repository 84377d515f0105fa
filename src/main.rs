//! Pibody demo: bring the ST7789 up and draw a gauge that ticks once a
//! second.

#![no_std]
#![no_main]

use core::fmt::Write;

use defmt::{info, unwrap};
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::spi::{self, Spi};
use embassy_time::{Delay, Duration, Timer};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use {defmt_rtt as _, panic_probe as _};

use pibody_display::color::{BLACK, BLUE, CYAN, GREEN, MAGENTA, WHITE, YELLOW};
use pibody_display::lcd::{LcdPins, NoPin};
use pibody_display::{color565, Config, St7789};

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Hello there!");

    let p = embassy_rp::init(Default::default());

    // Pins:
    //
    // * 10 - LCD CLK
    // * 11 - LCD DIN
    // * 13 - LCD Reset
    // * 14 - LCD D/C
    // * 15 - LCD CSn
    let mut config = spi::Config::default();
    config.frequency = 62_500_000;
    let spi = Spi::new_blocking_txonly(p.SPI1, p.PIN_10, p.PIN_11, config);
    let pins = LcdPins::new(
        spi,
        Output::new(p.PIN_14, Level::Low),
        Output::new(p.PIN_15, Level::High),
        Output::new(p.PIN_13, Level::High),
        None::<NoPin>,
        Delay,
    );

    let mut lcd = unwrap!(St7789::new(pins, Config::default()));
    info!("lcd up: {}", lcd.state());

    let style = MonoTextStyle::new(&profont::PROFONT_24_POINT, Rgb565::WHITE);
    unwrap!(Text::new("Pibody", Point::new(70, 30), style).draw(&mut lcd));

    {
        let mut raster = lcd.raster();
        unwrap!(raster.rect(4, 4, 232, 312, BLUE));
        unwrap!(raster.fill_circle(60, 260, 30, color565(0x20, 0x80, 0xFF)));
        unwrap!(raster.circle(60, 260, 34, CYAN));
        unwrap!(raster.fill_polygon(180, 260, 30, 5, 0.5, None, YELLOW));
        unwrap!(raster.polygon(180, 260, 36, 6, 1.2, None, MAGENTA));
        unwrap!(raster.line(20, 60, 220, 60, WHITE));
    }

    let small = MonoTextStyle::new(&profont::PROFONT_14_POINT, Rgb565::WHITE);
    let mut strbuf = heapless::String::<32>::new();
    let mut ticks: i32 = 0;
    loop {
        unwrap!(lcd.raster().progress_bar(120, 140, 50, ticks % 61, 0, 60, 6, GREEN, BLACK));

        strbuf.clear();
        write!(&mut strbuf, "{:02}s", ticks % 61).ok();
        unwrap!(lcd.fill_rect(100, 130, 40, 20, BLACK));
        unwrap!(Text::new(&strbuf, Point::new(102, 146), small).draw(&mut lcd));

        ticks += 1;
        Timer::after(Duration::from_secs(1)).await;
    }
}
