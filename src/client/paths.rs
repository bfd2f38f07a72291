//! Rap2 endpoint paths, relative to the configured base URL

pub const CAPTCHA: &str = "/captcha";
pub const LOGIN: &str = "/account/login";

pub const GET_REPOSITORY: &str = "/repository/get";
pub const CREATE_MODULE: &str = "/module/create";
pub const GET_INTERFACE: &str = "/interface/get";
pub const CREATE_INTERFACE: &str = "/interface/create";
pub const UPDATE_INTERFACE: &str = "/interface/update";
pub const UPDATE_INTERFACE_PROPERTIES: &str = "/properties/update";

/// `GET /repository/get` for one repository, without interface properties
pub fn get_repository(id: i64) -> String {
    format!("{GET_REPOSITORY}?id={id}&excludeProperty=true")
}

/// `GET /interface/get` for one interface
pub fn get_interface(id: i64) -> String {
    format!("{GET_INTERFACE}?id={id}")
}

/// `POST /properties/update` targeting one interface
pub fn update_interface_properties(interface_id: i64) -> String {
    format!("{UPDATE_INTERFACE_PROPERTIES}?itf={interface_id}")
}
