pub mod d410_profit_summary;
