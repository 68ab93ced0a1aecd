//! Five ST7789 round panels on one SPI bus, one chip-select each.

use anyhow::{anyhow, Result};
use log::info;

use crate::framebuffer::{ScreenBank, CHUNK_LINES};
use crate::layout::{SCREEN_COUNT, SCREEN_SIZE};

const PCLK_HZ: u32 = 40_000_000;

// ── Pins ────────────────────────────────────────────────────────────
const PIN_LCD_SCLK: i32 = 18;
const PIN_LCD_MOSI: i32 = 23;
const PIN_LCD_DC: i32 = 2;
const PIN_LCD_RST: i32 = 4;
const PIN_LCD_BL: i32 = 22;
const PIN_LCD_CS: [i32; SCREEN_COUNT] = [13, 33, 32, 25, 21];

pub fn esp_check(res: esp_idf_sys::esp_err_t, msg: &str) -> Result<()> {
    if res != esp_idf_sys::ESP_OK {
        Err(anyhow!("{} (err {})", msg, res))
    } else {
        Ok(())
    }
}

struct Panel {
    _io: esp_idf_sys::esp_lcd_panel_io_handle_t,
    handle: esp_idf_sys::esp_lcd_panel_handle_t,
}

/// All panels plus the DMA staging buffer used for transfers.
pub struct PanelBank {
    panels: Vec<Panel>,
    dma_buf: *mut u8,
    dma_bytes: usize,
}

impl PanelBank {
    pub fn init() -> Result<Self> {
        let mut bus_cfg = esp_idf_sys::spi_bus_config_t::default();
        bus_cfg.__bindgen_anon_1.mosi_io_num = PIN_LCD_MOSI;
        bus_cfg.__bindgen_anon_2.miso_io_num = -1;
        bus_cfg.__bindgen_anon_3.quadwp_io_num = -1;
        bus_cfg.__bindgen_anon_4.quadhd_io_num = -1;
        bus_cfg.sclk_io_num = PIN_LCD_SCLK;
        bus_cfg.max_transfer_sz = (SCREEN_SIZE * CHUNK_LINES * 2) as i32;

        let host = esp_idf_sys::spi_host_device_t_SPI2_HOST;
        esp_check(
            unsafe {
                esp_idf_sys::spi_bus_initialize(
                    host,
                    &bus_cfg,
                    esp_idf_sys::spi_common_dma_t_SPI_DMA_CH_AUTO,
                )
            },
            "spi_bus_initialize",
        )?;

        let mut panels = Vec::with_capacity(SCREEN_COUNT);
        for (i, &cs) in PIN_LCD_CS.iter().enumerate() {
            // Panels share the reset line; pulse it once.
            let reset = if i == 0 { PIN_LCD_RST } else { -1 };
            panels.push(init_panel(host, cs, reset)?);
            info!("panel {} ready (cs={})", i, cs);
        }

        let dma_bytes = (SCREEN_SIZE * CHUNK_LINES * 2) as usize;
        let dma_buf = unsafe {
            esp_idf_sys::heap_caps_malloc(
                dma_bytes,
                esp_idf_sys::MALLOC_CAP_DMA
                    | esp_idf_sys::MALLOC_CAP_INTERNAL
                    | esp_idf_sys::MALLOC_CAP_8BIT,
            ) as *mut u8
        };
        if dma_buf.is_null() {
            return Err(anyhow!("DMA buffer alloc failed ({} bytes)", dma_bytes));
        }

        Ok(Self {
            panels,
            dma_buf,
            dma_bytes,
        })
    }

    /// Send every screen drawn since the last flush to its panel.
    pub fn flush(&mut self, screens: &mut ScreenBank) {
        let dma = unsafe { core::slice::from_raw_parts_mut(self.dma_buf, self.dma_bytes) };
        for index in screens.take_dirty() {
            let (Some(panel), Some(fb)) = (self.panels.get(index), screens.screen(index)) else {
                continue;
            };
            let mut y = 0;
            while y < fb.height() {
                let y_end = (y + CHUNK_LINES).min(fb.height());
                fb.write_rows_be(y, y_end, dma);
                unsafe {
                    esp_idf_sys::esp_lcd_panel_draw_bitmap(
                        panel.handle,
                        0,
                        y as i32,
                        fb.width() as i32,
                        y_end as i32,
                        dma.as_ptr().cast(),
                    );
                }
                y = y_end;
            }
        }
    }
}

impl Drop for PanelBank {
    fn drop(&mut self) {
        unsafe {
            esp_idf_sys::heap_caps_free(self.dma_buf.cast());
        }
    }
}

fn init_panel(
    host: esp_idf_sys::spi_host_device_t,
    cs: i32,
    reset: i32,
) -> Result<Panel> {
    let mut io: esp_idf_sys::esp_lcd_panel_io_handle_t = std::ptr::null_mut();
    let io_cfg = esp_idf_sys::esp_lcd_panel_io_spi_config_t {
        cs_gpio_num: cs,
        dc_gpio_num: PIN_LCD_DC,
        spi_mode: 0,
        pclk_hz: PCLK_HZ,
        trans_queue_depth: 10,
        on_color_trans_done: None,
        user_ctx: std::ptr::null_mut(),
        lcd_cmd_bits: 8,
        lcd_param_bits: 8,
        flags: esp_idf_sys::esp_lcd_panel_io_spi_config_t__bindgen_ty_1 {
            _bitfield_align_1: [],
            _bitfield_1: esp_idf_sys::esp_lcd_panel_io_spi_config_t__bindgen_ty_1::new_bitfield_1(
                0, 0, 0, 0, 0, 0, 0, 0,
            ),
            __bindgen_padding_0: [0; 3],
        },
    };
    esp_check(
        unsafe {
            esp_idf_sys::esp_lcd_new_panel_io_spi(
                host as esp_idf_sys::esp_lcd_spi_bus_handle_t,
                &io_cfg,
                &mut io,
            )
        },
        "esp_lcd_new_panel_io_spi",
    )?;

    let mut panel: esp_idf_sys::esp_lcd_panel_handle_t = std::ptr::null_mut();
    let panel_cfg = esp_idf_sys::esp_lcd_panel_dev_config_t {
        reset_gpio_num: reset,
        __bindgen_anon_1: esp_idf_sys::esp_lcd_panel_dev_config_t__bindgen_ty_1 {
            rgb_ele_order: esp_idf_sys::lcd_rgb_element_order_t_LCD_RGB_ELEMENT_ORDER_BGR,
        },
        data_endian: esp_idf_sys::lcd_rgb_data_endian_t_LCD_RGB_DATA_ENDIAN_BIG,
        bits_per_pixel: 16,
        flags: esp_idf_sys::esp_lcd_panel_dev_config_t__bindgen_ty_2 {
            _bitfield_align_1: [],
            _bitfield_1: esp_idf_sys::esp_lcd_panel_dev_config_t__bindgen_ty_2::new_bitfield_1(0),
            __bindgen_padding_0: [0; 3],
        },
        vendor_config: std::ptr::null_mut(),
    };
    esp_check(
        unsafe { esp_idf_sys::esp_lcd_new_panel_st7789(io, &panel_cfg, &mut panel) },
        "esp_lcd_new_panel_st7789",
    )?;

    esp_check(unsafe { esp_idf_sys::esp_lcd_panel_reset(panel) }, "panel_reset")?;
    esp_check(unsafe { esp_idf_sys::esp_lcd_panel_init(panel) }, "panel_init")?;
    esp_check(
        unsafe { esp_idf_sys::esp_lcd_panel_invert_color(panel, true) },
        "panel_invert",
    )?;
    esp_check(
        unsafe { esp_idf_sys::esp_lcd_panel_disp_on_off(panel, true) },
        "disp_on",
    )?;

    Ok(Panel { _io: io, handle: panel })
}

pub fn enable_backlight() {
    unsafe {
        let io_conf = esp_idf_sys::gpio_config_t {
            pin_bit_mask: 1u64 << (PIN_LCD_BL as u64),
            mode: esp_idf_sys::gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: esp_idf_sys::gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: esp_idf_sys::gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: esp_idf_sys::gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        esp_idf_sys::gpio_config(&io_conf);
        esp_idf_sys::gpio_set_level(PIN_LCD_BL, 1);
    }
    info!("Backlight ON");
}
