//! pad2mqtt firmware entry point (ESP32, M5Stack Core).
//!
//! Wiring:
//!   - Buttons (active-low, input-only pads): LEFT=GPIO39 SEND=GPIO38 RIGHT=GPIO37
//!   - TFT (ILI9342C over SPI2): SCK=GPIO18 MOSI=GPIO23 DC=GPIO27 CS=GPIO14
//!     RST=GPIO33 BL=GPIO32
//!
//! Peripheral bring-up that fails leaves the board in an idle loop with the
//! fault logged; there is nothing sensible to fall back to without a
//! display or radio.

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::{Instant, Timer};
use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::clock::CpuClock;
use esp_hal::delay::Delay;
use esp_hal::gpio::{Input, InputConfig, Level, Output, OutputConfig};
use esp_hal::spi::master::Spi;
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;
use esp_radio::wifi::{ClientConfig, ModeConfig};
use log::{info, LevelFilter};
use mipidsi::interface::SpiInterface;
use mipidsi::models::ILI9342CRgb565;
use mipidsi::options::{ColorInversion, ColorOrder};
use mipidsi::Builder;
use static_cell::StaticCell;

use pad2mqtt::config::{TICK_INTERVAL_MS, WIFI_PASSWORD, WIFI_SSID};
use pad2mqtt::net::{MqttSession, WifiLink};
use pad2mqtt::panel::{Panel, PanelConfig};
use pad2mqtt::ui::{PanelButtons, PanelScreen};

esp_bootloader_esp_idf::esp_app_desc!();

static NET_RESOURCES: StaticCell<embassy_net::StackResources<4>> = StaticCell::new();
static DISPLAY_SPI_BUF: StaticCell<[u8; 512]> = StaticCell::new();

const DISPLAY_SPI_HZ: u32 = 40_000_000;

/// Park the core with the fault on the console.
async fn halt(reason: &str) -> ! {
    log::error!("halted: {}", reason);
    loop {
        Timer::after_secs(1).await;
    }
}

#[esp_rtos::main]
async fn main(_spawner: Spawner) -> ! {
    esp_println::logger::init_logger(LevelFilter::Info);
    esp_println::println!("boot: pad2mqtt starting");

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // esp-radio requires an allocator.
    esp_alloc::heap_allocator!(size: 65536);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // TFT on SPI2. Backlight first so early frames are visible.
    let _backlight = Output::new(peripherals.GPIO32, Level::High, OutputConfig::default());
    let dc = Output::new(peripherals.GPIO27, Level::Low, OutputConfig::default());
    let cs = Output::new(peripherals.GPIO14, Level::High, OutputConfig::default());
    let rst = Output::new(peripherals.GPIO33, Level::Low, OutputConfig::default());

    let spi_config = esp_hal::spi::master::Config::default()
        .with_frequency(Rate::from_hz(DISPLAY_SPI_HZ))
        .with_mode(esp_hal::spi::Mode::_0);
    let spi = match Spi::new(peripherals.SPI2, spi_config) {
        Ok(spi) => spi.with_sck(peripherals.GPIO18).with_mosi(peripherals.GPIO23),
        Err(err) => {
            log::error!("display spi init failed: {:?}", err);
            halt("display spi").await
        }
    };
    let spi_device = match ExclusiveDevice::new_no_delay(spi, cs) {
        Ok(dev) => dev,
        Err(err) => {
            log::error!("display cs claim failed: {:?}", err);
            halt("display cs").await
        }
    };

    let mut delay = Delay::new();
    let di = SpiInterface::new(spi_device, dc, DISPLAY_SPI_BUF.init([0; 512]));
    let display = match Builder::new(ILI9342CRgb565, di)
        .reset_pin(rst)
        .display_size(320, 240)
        .color_order(ColorOrder::Bgr)
        .invert_colors(ColorInversion::Inverted)
        .init(&mut delay)
    {
        Ok(display) => display,
        Err(err) => {
            log::error!("display init failed: {:?}", err);
            halt("display init").await
        }
    };
    let mut screen = PanelScreen::new(display);
    info!("display up (ILI9342C, SCK=18 MOSI=23 DC=27 CS=14 RST=33 BL=32)");

    // The board pulls these up externally; GPIO37-39 have no internal pulls.
    let input_cfg = InputConfig::default();
    let mut buttons = PanelButtons::new(
        Input::new(peripherals.GPIO39, input_cfg),
        Input::new(peripherals.GPIO38, input_cfg),
        Input::new(peripherals.GPIO37, input_cfg),
    );
    info!("buttons up (LEFT=39 SEND=38 RIGHT=37)");

    let radio = match esp_radio::init() {
        Ok(radio) => radio,
        Err(err) => {
            log::error!("esp-radio init failed: {:?}", err);
            halt("radio init").await
        }
    };
    let (mut wifi_controller, interfaces) =
        match esp_radio::wifi::new(&radio, peripherals.WIFI, esp_radio::wifi::Config::default()) {
            Ok(parts) => parts,
            Err(err) => {
                log::error!("wifi peripheral init failed: {:?}", err);
                halt("wifi init").await
            }
        };

    let client_config = ClientConfig::default()
        .with_ssid(WIFI_SSID.into())
        .with_password(WIFI_PASSWORD.into());
    if let Err(err) = wifi_controller.set_config(&ModeConfig::Client(client_config)) {
        log::error!("wifi mode config failed: {:?}", err);
        halt("wifi config").await
    }

    let stack_config = embassy_net::Config::dhcpv4(Default::default());
    let (stack, mut net_runner) = embassy_net::new(
        interfaces.sta,
        stack_config,
        NET_RESOURCES.init(embassy_net::StackResources::<4>::new()),
        0x70AD_2077_CAFE_0001,
    );

    let mut wifi_link = WifiLink::new(wifi_controller);
    let mut panel = Panel::new(PanelConfig::default());

    let net_future = net_runner.run();
    let panel_future = async {
        if !panel.startup(&mut wifi_link, &mut screen).await {
            info!("continuing without network for this boot cycle");
        }

        // A session that errors is poisoned and must be replaced; the
        // outer loop re-borrows fresh buffers for each replacement while
        // the panel (and its reconnect cooldown) lives on.
        loop {
            let mut rx_buf = [0u8; 1024];
            let mut tx_buf = [0u8; 1024];
            let mut write_buf = [0u8; 512];
            let mut recv_buf = [0u8; 512];
            let mut session = MqttSession::new(
                stack,
                &mut rx_buf,
                &mut tx_buf,
                &mut write_buf,
                &mut recv_buf,
            );

            while !session.poisoned() {
                let now_ms = Instant::now().as_millis();
                panel
                    .tick(now_ms, &mut buttons, &mut wifi_link, &mut session, &mut screen)
                    .await;
                Timer::after_millis(TICK_INTERVAL_MS).await;
            }
            info!("replacing mqtt session");
        }
    };

    embassy_futures::join::join(net_future, panel_future).await;
    halt("control loop exited").await
}
