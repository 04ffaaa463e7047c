mod pricing_request;
mod pricing_result;

pub use pricing_request::{
    CalculateBatchRequest, CalculatePriceRequest, OrderLine, RegisterSupplierDiscountRequest,
    MAX_QUANTITY,
};
pub use pricing_result::{BatchItemError, BatchPricingResult, PricingResult};
