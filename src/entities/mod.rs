pub mod daily_report;
pub mod item;
pub mod material;
pub mod material_move;
pub mod order;
pub mod order_file;
pub mod order_status;
pub mod preset_category;
pub mod preset_extra;
pub mod preset_item;
pub mod pricing_flyers_tier;
pub mod printer;
pub mod printer_counter;
pub mod product_material;
pub mod user;
