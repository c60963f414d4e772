// Standardized error codes for Practice Desk

pub mod validation {
    pub const MISSING_REQUIRED_FIELD: &str = "VALIDATION_1001";
    pub const INVALID_FORMAT: &str = "VALIDATION_1002";
}

pub mod network {
    pub const UNREACHABLE: &str = "NET_2001";
    pub const REQUEST_REJECTED: &str = "NET_2002";
    pub const SERVER_ERROR: &str = "NET_2003";
}

pub mod lookup {
    pub const NOT_FOUND: &str = "LOOKUP_3001";
}

pub mod config {
    pub const INVALID: &str = "CONFIG_4001";
}

pub mod internal {
    pub const UNEXPECTED: &str = "INTERNAL_5001";
}
