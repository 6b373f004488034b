//! Panel Layout Table
//! Fixed row/series/style assignments for the four-panel trial chart.

use crate::data::Channel;
use serde::{Serialize, Serializer};

/// Opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    pub fn hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

/// Line pattern of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dash {
    Solid,
    /// Used for setpoints.
    Dot,
}

/// Style attributes of one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesStyle {
    pub color: Rgb,
    pub dash: Dash,
    pub width: f32,
    /// Fill down to y = 0 with a translucent copy of `color`.
    pub fill_to_zero: bool,
}

/// Binding of one CSV channel to a styled series.
#[derive(Debug, Clone, Copy)]
pub struct SeriesDef {
    pub channel: Channel,
    pub name: &'static str,
    pub style: SeriesStyle,
}

/// One stacked panel, labelled only by its y-axis title.
#[derive(Debug, Clone, Copy)]
pub struct RowDef {
    pub y_title: &'static str,
    /// Fixed y-axis view; `None` auto-scales to the data.
    pub y_range: Option<[f64; 2]>,
    pub series: &'static [SeriesDef],
}

/// Figure-wide presentation settings.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FigureStyle {
    pub height: u32,
    pub vertical_spacing: f32,
    pub background: Rgb,
    pub foreground: Rgb,
    pub grid_color: Rgb,
    /// Opacity of area fills.
    pub fill_alpha: f32,
}

pub const FIGURE_STYLE: FigureStyle = FigureStyle {
    height: 900,
    vertical_spacing: 0.03,
    background: Rgb::WHITE,
    foreground: Rgb::BLACK,
    grid_color: Rgb(0xF0, 0xF0, 0xF0),
    fill_alpha: 0.1,
};

/// Fixed valve-panel view so panels from different trials compare directly.
pub const VALVE_Y_RANGE: [f64; 2] = [0.0, 105.0];

const LINE_WIDTH: f32 = 2.0;

const fn solid(color: Rgb) -> SeriesStyle {
    SeriesStyle {
        color,
        dash: Dash::Solid,
        width: LINE_WIDTH,
        fill_to_zero: false,
    }
}

const fn dotted(color: Rgb) -> SeriesStyle {
    SeriesStyle {
        color,
        dash: Dash::Dot,
        width: LINE_WIDTH,
        fill_to_zero: false,
    }
}

const fn filled(color: Rgb) -> SeriesStyle {
    SeriesStyle {
        color,
        dash: Dash::Solid,
        width: LINE_WIDTH,
        fill_to_zero: true,
    }
}

const TEMPERATURE: [SeriesDef; 2] = [
    SeriesDef {
        channel: Channel::ProcessTempSp,
        name: "Process Temp SP",
        style: dotted(Rgb::BLACK),
    },
    SeriesDef {
        channel: Channel::ProcessTemp,
        name: "Process Temp",
        style: solid(Rgb(0xD3, 0x2F, 0x2F)),
    },
];

const PRESSURE: [SeriesDef; 3] = [
    SeriesDef {
        channel: Channel::PressureSp,
        name: "Pressure SP",
        style: dotted(Rgb(0x1A, 0x23, 0x7E)),
    },
    SeriesDef {
        channel: Channel::InletSteamPressure,
        name: "Inlet P1",
        style: solid(Rgb(0x00, 0x4D, 0x40)),
    },
    SeriesDef {
        channel: Channel::OutletSteamPressure,
        name: "Outlet P2",
        style: filled(Rgb(0x00, 0x00, 0x8B)),
    },
];

const FLOW: [SeriesDef; 1] = [SeriesDef {
    channel: Channel::SteamFlowRate,
    name: "Flow Rate",
    style: filled(Rgb(0x7B, 0x1F, 0xA2)),
}];

const VALVE: [SeriesDef; 1] = [SeriesDef {
    channel: Channel::ValveOpeningPct,
    name: "Valve %",
    style: filled(Rgb(0xB8, 0x86, 0x0B)),
}];

/// Row index → panel definition.
pub static PANEL_LAYOUT: [RowDef; 4] = [
    RowDef {
        y_title: "Temp (°C)",
        y_range: None,
        series: &TEMPERATURE,
    },
    RowDef {
        y_title: "Bar",
        y_range: None,
        series: &PRESSURE,
    },
    RowDef {
        y_title: "kg/hr",
        y_range: None,
        series: &FLOW,
    },
    RowDef {
        y_title: "%",
        y_range: Some(VALVE_Y_RANGE),
        series: &VALVE,
    },
];
