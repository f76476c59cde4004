pub mod category_service;
pub mod errors;
pub mod export;
pub mod pagination;
pub mod picture;
pub mod product_service;

#[cfg(test)]
mod test_support;
