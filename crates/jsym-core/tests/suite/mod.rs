mod replace_file;
