mod item_base_price;
mod price_list;
mod price_list_detail;

pub use item_base_price::{BasePriceInput, ItemBasePrice};
pub use price_list::{NewPriceList, PriceList, PriceListRow, PriceListType, SalesChannel};
pub use price_list_detail::{DuplicatePriceList, DuplicatedPriceList, PriceListDetail};
