/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/
/// Field selectors and known resource fields
pub mod fields;
/// HTTP transport and request description
pub mod http;
/// Position helpers
pub mod positions;
/// Request models for API calls
pub mod requests;
/// Response models from API calls
pub mod responses;
