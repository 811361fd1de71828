//! Developer tooling for the touch engine: replay recorded pointer traces,
//! inspect keyboard geometry, export and validate settings.

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            std::process::exit(1);
        })
    };
}

pub mod commands;
