pub(crate) mod assets;
pub(crate) mod auth;
pub(crate) mod health;
pub(crate) mod portfolios;
pub(crate) mod sentiment;
pub(crate) mod stocks;
