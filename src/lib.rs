pub mod space {
    pub mod allocation;
    pub mod allocator;
    pub mod error;
    pub mod shared;
}

pub mod render {
    pub mod grid;
}

pub mod sim {
    pub mod config;
    pub mod driver;
    pub mod logging;
    pub mod workload;
}

pub mod cli {
    pub mod shell;
    pub mod utils;
}
