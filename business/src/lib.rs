pub mod application {
    pub mod cart {
        pub mod analyze;
    }
    pub mod checkout {
        pub mod process;
    }
}

pub mod domain {
    pub mod logger;
    pub mod cart {
        pub mod errors;
        pub mod extraction;
        pub mod model;
        pub mod services;
        pub mod use_cases {
            pub mod analyze;
        }
    }
    pub mod checkout {
        pub mod errors;
        pub mod model;
        pub mod use_cases {
            pub mod checkout;
        }
    }
}
