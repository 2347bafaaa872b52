mod common;
mod provincial;
mod routing;
mod scoring;
