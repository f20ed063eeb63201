pub mod stage1_load;
pub mod stage2_partition;
pub mod stage3_stats;
pub mod stage4_density;
pub mod stage5_report;
