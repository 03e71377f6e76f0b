mod test_frame_basic;
mod test_tiling_basic;
