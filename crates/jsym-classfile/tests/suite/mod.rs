mod stub;
