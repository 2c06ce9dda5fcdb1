mod global {
    turf::style_sheet!("assets/global.css");
}

mod controls {
    turf::style_sheet!("assets/controls.css");
}

mod charts {
    turf::style_sheet!("assets/charts.css");
}

pub use charts::ClassName as Charts;
pub use controls::ClassName as Controls;
pub use global::ClassName as Global;

use std::sync::LazyLock;

pub static ALL: LazyLock<String> = LazyLock::new(|| {
    [
        global::STYLE_SHEET,
        controls::STYLE_SHEET,
        charts::STYLE_SHEET,
    ]
    .join("\n")
});
