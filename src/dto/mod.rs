pub mod hh_dto;
pub mod report_dto;
